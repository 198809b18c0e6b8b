//! Field normalization and salted digests
//!
//! digest = hex(SHA-256("{field.name}:{normalized_value}:{salt}"))
//!
//! Normalization by kind (after trimming and lowercasing):
//! - `exact`: unchanged
//! - `fuzzy`: leading honorific removed, only `[a-z0-9 -]` kept, hyphens
//!   become spaces, whitespace runs collapse to one space
//! - `phonetic`: replaced by its phonetic code

use sha2::{Digest, Sha256};

use super::phonetic::PhoneticEncoder;
use super::record::{FieldValue, SensitiveField};

/// Honorifics stripped from the start of fuzzy values (at most one)
const HONORIFICS: [&str; 4] = ["mr ", "mrs ", "ms ", "dr "];

/// Normalize a field value for hashing
pub fn normalize_field_value(value: &FieldValue) -> String {
    let base = value.raw().trim().to_lowercase();

    match value {
        FieldValue::Exact(_) => base,
        FieldValue::Fuzzy(_) => normalize_fuzzy(&base),
        FieldValue::Phonetic(_) => PhoneticEncoder::new().encode(&base),
    }
}

fn normalize_fuzzy(value: &str) -> String {
    let stripped = HONORIFICS
        .iter()
        .find_map(|prefix| value.strip_prefix(prefix))
        .unwrap_or(value);

    let cleaned: String = stripped
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
        .map(|c| if c == '-' { ' ' } else { c })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Salted SHA-256 digest of a field, hex-encoded
///
/// Deterministic in `(name, value, kind, salt)`.
pub fn hash_sensitive_field(field: &SensitiveField, salt: &str) -> String {
    let normalized = normalize_field_value(&field.value);

    let mut hasher = Sha256::new();
    hasher.update(field.name.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hasher.update(b":");
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}
