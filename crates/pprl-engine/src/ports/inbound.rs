//! Inbound Ports (Driving Ports)
//!
//! These traits and message types define the API that the orchestration
//! layer uses to run record linkage. Callers hand over already-ingested
//! records; the engine performs no I/O.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BloomFilter, DataProviderRecord, ExportedBloomFilter, SensitiveField};
use crate::error::{DecodeError, PprlError, ValidationError};

/// A linkage query against one provider's candidate records
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PprlRequest {
    pub query_fields: BTreeMap<String, SensitiveField>,
    pub provider_id: String,
    /// Minimum similarity in (0, 1]
    pub threshold: f64,
}

impl PprlRequest {
    pub fn new(provider_id: impl Into<String>, threshold: f64) -> Self {
        Self {
            query_fields: BTreeMap::new(),
            provider_id: provider_id.into(),
            threshold,
        }
    }

    /// Add a query field under its own name
    pub fn with_field(mut self, field: SensitiveField) -> Self {
        self.query_fields.insert(field.name.clone(), field);
        self
    }
}

/// Context attached to every linkage response
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub query_field_count: usize,
    pub candidate_count: usize,
    /// Fill-based estimate for the query filter
    pub false_positive_rate: f64,
    pub timestamp: DateTime<Utc>,
    pub scan_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_record_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_provider_id: Option<String>,
}

/// Outcome of a linkage query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PprlResponse {
    pub match_found: bool,
    /// Similarity of the best match, 0.0 when none qualified
    pub confidence: f64,
    pub provider_id: String,
    /// Winning record's fields whose digest the query filter contains
    pub matched_fields: Vec<String>,
    /// Hex-encoded query filter
    #[serde(rename = "bloom_filter")]
    pub bloom_filter_hex: String,
    pub metadata: MatchMetadata,
}

/// Primary PPRL API (Driving Port)
pub trait PprlApi: Send + Sync {
    /// Salted digest of one field
    fn hash_sensitive_field(&self, field: &SensitiveField) -> String;

    /// Filter holding every field digest and `"{name}:{digest}"` token
    fn create_bloom_filter_for_record(&self, record: &DataProviderRecord) -> BloomFilter;

    /// Reject malformed requests. Must be called before `perform_pprl`.
    fn validate_pprl_request(&self, request: &PprlRequest) -> Result<(), ValidationError>;

    /// Score every candidate and return the best one above threshold
    ///
    /// Does not validate `request`.
    fn perform_pprl(&self, request: &PprlRequest, candidates: &[DataProviderRecord])
        -> PprlResponse;

    /// Like `perform_pprl`, but gives up once `deadline` has elapsed
    ///
    /// An unfinished scan is reported as `PprlError::DeadlineExceeded`,
    /// never as "no match".
    fn perform_pprl_within(
        &self,
        request: &PprlRequest,
        candidates: &[DataProviderRecord],
        deadline: Duration,
    ) -> Result<PprlResponse, PprlError>;

    fn export_bloom_filter(&self, filter: &BloomFilter) -> ExportedBloomFilter;

    fn import_bloom_filter(&self, exported: &ExportedBloomFilter) -> Result<BloomFilter, DecodeError>;
}
