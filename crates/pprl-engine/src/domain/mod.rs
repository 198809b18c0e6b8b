//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - Core Bloom filter implementation
//! - Hash functions
//! - Parameter calculations
//! - Configuration
//! - Phonetic encoder and fuzzy matcher
//! - Field normalization and salted digests
//! - Sensitive fields and provider records
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod bloom_filter;
pub mod config;
pub mod fuzzy;
pub mod hash_functions;
pub mod normalization;
pub mod parameters;
pub mod phonetic;
pub mod record;

pub use bloom_filter::{BloomFilter, ExportedBloomFilter};
pub use config::{
    PprlConfig, PprlConfigBuilder, DEVELOPMENT_SALT, MAX_FILTER_SIZE, MAX_HASH_COUNT,
};
pub use fuzzy::FuzzyMatcher;
pub use hash_functions::HashScheme;
pub use normalization::{hash_sensitive_field, normalize_field_value};
pub use parameters::{calculate_optimal_parameters, BloomFilterParams};
pub use phonetic::PhoneticEncoder;
pub use record::{DataProviderRecord, FieldKind, FieldValue, RawSensitiveField, SensitiveField};
