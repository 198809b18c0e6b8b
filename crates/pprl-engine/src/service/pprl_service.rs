//! PPRL Service
//!
//! Orchestrates field hashing, per-record Bloom filters and candidate scoring.
//!
//! Every call is a pure function of its inputs and the configured
//! `(filter_size, hash_count, salt, hash_scheme)`. Filters are created per
//! call and dropped when it returns; nothing is shared between calls.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{
    hash_sensitive_field, BloomFilter, DataProviderRecord, ExportedBloomFilter, PprlConfig,
    SensitiveField,
};
use crate::error::{DecodeError, PprlError, ValidationError};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{MatchMetadata, PprlApi, PprlRequest, PprlResponse};

/// Best qualifying candidate seen so far
#[derive(Clone, Copy, Debug)]
struct MatchResult {
    /// Position in the candidate slice
    index: usize,
    similarity: f64,
}

impl MatchResult {
    /// Qualifies iff `similarity >= threshold`. A NaN threshold admits nothing.
    fn qualifies(&self, threshold: f64) -> bool {
        self.similarity >= threshold
    }

    /// Higher similarity wins; on a tie the earlier candidate wins.
    ///
    /// Commutative and associative.
    fn prefer(self, other: MatchResult) -> MatchResult {
        if other.similarity > self.similarity
            || (other.similarity == self.similarity && other.index < self.index)
        {
            other
        } else {
            self
        }
    }
}

/// PPRL Service implementation
///
/// Implements the `PprlApi` port.
pub struct PprlService {
    config: PprlConfig,
    metrics: Arc<dyn MetricsRecorder>,
}

impl PprlService {
    /// Create a new service, validating the configuration
    pub fn new(config: PprlConfig) -> Result<Self, PprlError> {
        Self::with_metrics(config, Arc::new(NoOpMetrics))
    }

    /// Create with a metrics recorder
    pub fn with_metrics(
        config: PprlConfig,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, PprlError> {
        config.validate()?;
        Ok(Self { config, metrics })
    }

    pub fn config(&self) -> &PprlConfig {
        &self.config
    }

    fn empty_filter(&self) -> BloomFilter {
        BloomFilter::with_scheme(
            self.config.filter_size,
            self.config.hash_count,
            self.config.hash_scheme,
        )
    }

    /// Build a filter from a field map
    ///
    /// Each field contributes its digest and the composite token
    /// `"{field_name}:{digest}"`, which ties the digest to the field it came from.
    pub fn create_bloom_filter_for_fields(
        &self,
        fields: &BTreeMap<String, SensitiveField>,
    ) -> BloomFilter {
        let mut filter = self.empty_filter();
        for (field_name, field) in fields {
            let digest = self.hash_sensitive_field(field);
            filter.insert(&digest);
            filter.insert(&format!("{}:{}", field_name, digest));
        }
        self.metrics.record_filter_built(filter.size_bits());
        filter
    }

    fn score(&self, query: &BloomFilter, index: usize, candidate: &DataProviderRecord) -> MatchResult {
        let filter = self.create_bloom_filter_for_fields(&candidate.fields);
        MatchResult {
            index,
            similarity: query.jaccard_similarity(&filter),
        }
    }

    /// Sequential scan. `Err(scanned)` when the deadline passes first.
    fn scan_sequential(
        &self,
        query: &BloomFilter,
        candidates: &[DataProviderRecord],
        threshold: f64,
        deadline: Option<(Instant, Duration)>,
    ) -> Result<Option<MatchResult>, usize> {
        let mut best: Option<MatchResult> = None;

        for (index, candidate) in candidates.iter().enumerate() {
            if let Some((started, budget)) = deadline {
                if started.elapsed() >= budget {
                    return Err(index);
                }
            }

            let scored = self.score(query, index, candidate);
            if !scored.qualifies(threshold) {
                continue;
            }
            best = Some(match best {
                Some(current) => current.prefer(scored),
                None => scored,
            });
        }

        Ok(best)
    }

    fn scan_parallel(
        &self,
        query: &BloomFilter,
        candidates: &[DataProviderRecord],
        threshold: f64,
    ) -> Option<MatchResult> {
        candidates
            .par_iter()
            .enumerate()
            .map(|(index, candidate)| self.score(query, index, candidate))
            .filter(|scored| scored.qualifies(threshold))
            .reduce_with(MatchResult::prefer)
    }

    /// Winning record's field names whose own digest is in the query filter
    ///
    /// Best effort: subject to the query filter's false positive rate.
    fn matched_fields(&self, query: &BloomFilter, record: &DataProviderRecord) -> Vec<String> {
        record
            .fields
            .iter()
            .filter(|(_, field)| query.contains(&self.hash_sensitive_field(field)))
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn build_response(
        &self,
        request: &PprlRequest,
        candidates: &[DataProviderRecord],
        query: &BloomFilter,
        best: Option<MatchResult>,
        scan_id: Uuid,
    ) -> PprlResponse {
        let mut metadata = MatchMetadata {
            query_field_count: request.query_fields.len(),
            candidate_count: candidates.len(),
            false_positive_rate: query.false_positive_rate(),
            timestamp: Utc::now(),
            scan_id,
            matched_record_id: None,
            matched_provider_id: None,
        };

        let winner = best.and_then(|m| candidates.get(m.index).map(|record| (m, record)));

        match winner {
            Some((result, record)) => {
                metadata.matched_record_id = Some(record.id.clone());
                metadata.matched_provider_id = Some(record.provider_id.clone());

                PprlResponse {
                    match_found: true,
                    confidence: result.similarity,
                    provider_id: request.provider_id.clone(),
                    matched_fields: self.matched_fields(query, record),
                    bloom_filter_hex: query.to_hex(),
                    metadata,
                }
            }
            None => PprlResponse {
                match_found: false,
                confidence: 0.0,
                provider_id: request.provider_id.clone(),
                matched_fields: Vec::new(),
                bloom_filter_hex: query.to_hex(),
                metadata,
            },
        }
    }

    fn finish(
        &self,
        request: &PprlRequest,
        candidates: &[DataProviderRecord],
        query: &BloomFilter,
        best: Option<MatchResult>,
        scan_id: Uuid,
        started: Instant,
    ) -> PprlResponse {
        let response = self.build_response(request, candidates, query, best, scan_id);
        self.metrics
            .record_scan(started.elapsed(), candidates.len(), response.match_found);

        if response.match_found {
            info!(
                %scan_id,
                record_id = ?response.metadata.matched_record_id,
                confidence = response.confidence,
                matched_fields = response.matched_fields.len(),
                "PPRL match found"
            );
        } else {
            debug!(%scan_id, candidates = candidates.len(), "PPRL scan found no match");
        }

        response
    }
}

impl PprlApi for PprlService {
    fn hash_sensitive_field(&self, field: &SensitiveField) -> String {
        self.metrics.record_field_hashed();
        hash_sensitive_field(field, &self.config.salt)
    }

    fn create_bloom_filter_for_record(&self, record: &DataProviderRecord) -> BloomFilter {
        self.create_bloom_filter_for_fields(&record.fields)
    }

    fn validate_pprl_request(&self, request: &PprlRequest) -> Result<(), ValidationError> {
        if request.query_fields.is_empty() {
            return Err(ValidationError::EmptyQueryFields);
        }

        if request.provider_id.trim().is_empty() {
            return Err(ValidationError::EmptyProviderId);
        }

        // Written to also reject NaN
        if !(request.threshold > 0.0 && request.threshold <= 1.0) {
            return Err(ValidationError::ThresholdOutOfRange {
                threshold: request.threshold,
            });
        }

        for (key, field) in &request.query_fields {
            if field.name.trim().is_empty() {
                return Err(ValidationError::EmptyFieldName { key: key.clone() });
            }
            if field.value.raw().trim().is_empty() {
                return Err(ValidationError::EmptyFieldValue {
                    field: field.name.clone(),
                });
            }
        }

        Ok(())
    }

    #[instrument(
        skip(self, request, candidates),
        fields(provider_id = %request.provider_id, candidates = candidates.len())
    )]
    fn perform_pprl(
        &self,
        request: &PprlRequest,
        candidates: &[DataProviderRecord],
    ) -> PprlResponse {
        let scan_id = Uuid::new_v4();
        let started = Instant::now();
        let query = self.create_bloom_filter_for_fields(&request.query_fields);

        let best = if candidates.len() >= self.config.parallel_threshold {
            debug!(%scan_id, "Scanning candidates in parallel");
            self.scan_parallel(&query, candidates, request.threshold)
        } else {
            // Without a deadline the sequential scan always completes.
            self.scan_sequential(&query, candidates, request.threshold, None)
                .unwrap_or(None)
        };

        self.finish(request, candidates, &query, best, scan_id, started)
    }

    #[instrument(
        skip(self, request, candidates),
        fields(provider_id = %request.provider_id, candidates = candidates.len())
    )]
    fn perform_pprl_within(
        &self,
        request: &PprlRequest,
        candidates: &[DataProviderRecord],
        deadline: Duration,
    ) -> Result<PprlResponse, PprlError> {
        let scan_id = Uuid::new_v4();
        let started = Instant::now();
        let query = self.create_bloom_filter_for_fields(&request.query_fields);

        match self.scan_sequential(&query, candidates, request.threshold, Some((started, deadline))) {
            Ok(best) => Ok(self.finish(request, candidates, &query, best, scan_id, started)),
            Err(scanned) => {
                self.metrics.record_deadline_exceeded(scanned);
                warn!(
                    %scan_id,
                    scanned,
                    total = candidates.len(),
                    "PPRL scan deadline exceeded, result undecided"
                );
                Err(PprlError::DeadlineExceeded {
                    scanned,
                    total: candidates.len(),
                })
            }
        }
    }

    fn export_bloom_filter(&self, filter: &BloomFilter) -> ExportedBloomFilter {
        filter.export()
    }

    fn import_bloom_filter(&self, exported: &ExportedBloomFilter) -> Result<BloomFilter, DecodeError> {
        BloomFilter::from_hex_with_scheme(
            &exported.bits_hex,
            exported.size,
            exported.hash_count,
            self.config.hash_scheme,
        )
    }
}
