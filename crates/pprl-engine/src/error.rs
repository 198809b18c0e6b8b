//! Error types for the PPRL engine

use thiserror::Error;

/// Malformed linkage request.
///
/// Returned by `validate_pprl_request` and by field-type parsing. Matching
/// never validates implicitly, so callers see these before any filter is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Query fields cannot be empty")]
    EmptyQueryFields,

    #[error("Provider id cannot be empty")]
    EmptyProviderId,

    #[error("Threshold out of range: {threshold} (must be in (0, 1])")]
    ThresholdOutOfRange { threshold: f64 },

    #[error("Field name cannot be empty (key: {key:?})")]
    EmptyFieldName { key: String },

    #[error("Field value cannot be empty: {field}")]
    EmptyFieldValue { field: String },

    #[error("Unknown field type: {0} (expected exact, fuzzy or phonetic)")]
    UnknownFieldType(String),
}

/// Failure to decode an exported Bloom filter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Invalid filter parameters: size={size}, hash_count={hash_count}")]
    InvalidParameters { size: usize, hash_count: usize },
}

impl From<hex::FromHexError> for DecodeError {
    fn from(err: hex::FromHexError) -> Self {
        DecodeError::InvalidHex(err.to_string())
    }
}

/// Errors that can occur in the PPRL engine
#[derive(Debug, Error)]
pub enum PprlError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Deadline exceeded after scanning {scanned} of {total} candidates")]
    DeadlineExceeded { scanned: usize, total: usize },
}
