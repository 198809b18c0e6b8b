//! PPRL engine configuration and validation
//!
//! The salt and filter calibration are supplied by the hosting service; the
//! engine treats them as opaque inputs.
//!
//! # Example
//!
//! ```ignore
//! use pprl_engine::domain::PprlConfigBuilder;
//!
//! let config = PprlConfigBuilder::new()
//!     .salt("shared-broker-salt")
//!     .filter_size(2048)
//!     .hash_count(4)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::hash_functions::HashScheme;
use super::parameters::{calculate_optimal_parameters, TOKENS_PER_FIELD};
use crate::error::PprlError;

/// Placeholder salt for local development. Rejected by `validate_for_production`.
pub const DEVELOPMENT_SALT: &str = "pprl-development-salt";

/// Upper bound on hash functions per element
pub const MAX_HASH_COUNT: usize = 32;

/// Upper bound on filter size in bits (2 MiB of filter state)
pub const MAX_FILTER_SIZE: usize = 1 << 24;

/// PPRL engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PprlConfig {
    /// Bloom filter size in bits
    pub filter_size: usize,
    /// Number of hash functions per element
    pub hash_count: usize,
    /// Shared secret mixed into every field digest
    pub salt: String,
    /// Bit-position derivation
    pub hash_scheme: HashScheme,
    /// Candidate count at which scans switch to parallel execution
    pub parallel_threshold: usize,
}

impl Default for PprlConfig {
    fn default() -> Self {
        Self {
            filter_size: 1000,
            hash_count: 3,
            salt: DEVELOPMENT_SALT.to_string(),
            hash_scheme: HashScheme::SeededFnv1a,
            parallel_threshold: 64,
        }
    }
}

impl PprlConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), PprlError> {
        if self.filter_size == 0 {
            return Err(PprlError::InvalidConfig(
                "filter_size cannot be 0".to_string(),
            ));
        }

        if self.filter_size > MAX_FILTER_SIZE {
            return Err(PprlError::InvalidConfig(format!(
                "filter_size must be at most {}, got {}",
                MAX_FILTER_SIZE, self.filter_size
            )));
        }

        if self.hash_count == 0 || self.hash_count > MAX_HASH_COUNT {
            return Err(PprlError::InvalidConfig(format!(
                "hash_count must be between 1 and {}, got {}",
                MAX_HASH_COUNT, self.hash_count
            )));
        }

        if self.salt.is_empty() {
            return Err(PprlError::InvalidConfig("salt cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Validate configuration for production readiness
    ///
    /// Returns `Err` if the salt is still the development placeholder.
    pub fn validate_for_production(&self) -> Result<(), PprlError> {
        self.validate()?;
        if self.salt == DEVELOPMENT_SALT {
            return Err(PprlError::InvalidConfig(
                "salt is the development placeholder; set PPRL_SALT".to_string(),
            ));
        }
        Ok(())
    }

    /// Size the filter for `expected_fields` per record at `target_fpr`
    pub fn calibrated(expected_fields: usize, target_fpr: f64) -> Self {
        let params = calculate_optimal_parameters(expected_fields * TOKENS_PER_FIELD, target_fpr);
        Self {
            filter_size: params.size_bits,
            hash_count: params.hash_count,
            ..Default::default()
        }
    }

    /// Load defaults overlaid with `PPRL_*` environment variables
    pub fn from_env() -> Self {
        Self::default().overlay_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from a key lookup. Unparsable values are skipped.
    pub fn overlay_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(salt) = lookup("PPRL_SALT") {
            if salt.is_empty() {
                warn!("PPRL_SALT is set but empty, keeping configured salt");
            } else {
                self.salt = salt;
                info!("Loaded PPRL salt from environment");
            }
        }

        if let Some(raw) = lookup("PPRL_FILTER_SIZE") {
            match raw.parse() {
                Ok(size) => self.filter_size = size,
                Err(_) => warn!(value = %raw, "PPRL_FILTER_SIZE is not a valid integer"),
            }
        }

        if let Some(raw) = lookup("PPRL_HASH_COUNT") {
            match raw.parse() {
                Ok(count) => self.hash_count = count,
                Err(_) => warn!(value = %raw, "PPRL_HASH_COUNT is not a valid integer"),
            }
        }

        if let Some(raw) = lookup("PPRL_PARALLEL_THRESHOLD") {
            match raw.parse() {
                Ok(threshold) => self.parallel_threshold = threshold,
                Err(_) => warn!(value = %raw, "PPRL_PARALLEL_THRESHOLD is not a valid integer"),
            }
        }

        self
    }
}

/// Builder for PprlConfig with validation
#[derive(Default)]
pub struct PprlConfigBuilder {
    filter_size: Option<usize>,
    hash_count: Option<usize>,
    salt: Option<String>,
    hash_scheme: Option<HashScheme>,
    parallel_threshold: Option<usize>,
}

impl PprlConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set Bloom filter size in bits
    pub fn filter_size(mut self, bits: usize) -> Self {
        self.filter_size = Some(bits);
        self
    }

    /// Set number of hash functions
    pub fn hash_count(mut self, count: usize) -> Self {
        self.hash_count = Some(count);
        self
    }

    pub fn salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    pub fn hash_scheme(mut self, scheme: HashScheme) -> Self {
        self.hash_scheme = Some(scheme);
        self
    }

    /// Set candidate count at which scans run in parallel
    pub fn parallel_threshold(mut self, candidates: usize) -> Self {
        self.parallel_threshold = Some(candidates);
        self
    }

    /// Build the PprlConfig, validating all parameters
    pub fn build(self) -> Result<PprlConfig, PprlError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation
    pub fn build_unchecked(self) -> PprlConfig {
        let defaults = PprlConfig::default();

        PprlConfig {
            filter_size: self.filter_size.unwrap_or(defaults.filter_size),
            hash_count: self.hash_count.unwrap_or(defaults.hash_count),
            salt: self.salt.unwrap_or(defaults.salt),
            hash_scheme: self.hash_scheme.unwrap_or(defaults.hash_scheme),
            parallel_threshold: self.parallel_threshold.unwrap_or(defaults.parallel_threshold),
        }
    }
}
