//! # PPRL Engine
//!
//! Privacy-preserving record linkage for the identity broker. Decides whether
//! a query record and a provider's candidate record describe the same person
//! using only salted digests, never raw values.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `BloomFilter`: Core probabilistic data structure
//!   - `PhoneticEncoder`: Soundex-style name codes
//!   - `FuzzyMatcher`: Levenshtein similarity and phonetic equality
//!   - `hash_sensitive_field`: Normalization plus salted SHA-256
//!   - `PprlConfig` / `PprlConfigBuilder`: Salt and filter calibration
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `PprlApi`: Driving port (inbound API)
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `PprlService`: Implements `PprlApi`
//!
//! ## Matching
//!
//! 1. Every field is normalized by kind (exact, fuzzy, phonetic) and hashed
//!    as `SHA-256("{name}:{normalized}:{salt}")`.
//! 2. Each record gets a fresh Bloom filter holding every digest and every
//!    `"{name}:{digest}"` token.
//! 3. Candidates are scored by Jaccard similarity of set bits against the
//!    query filter; the best score at or above the threshold wins, ties go
//!    to the earliest candidate.
//!
//! The score is whole-filter bit overlap, not a count of agreeing fields.
//!
//! ## Invariants
//!
//! - No false negatives - if inserted, contains() MUST return true
//! - Digests are deterministic in `(name, value, kind, salt)`
//! - Parallel and sequential scans select the same winner
//!
//! ## Usage Example
//!
//! ```ignore
//! use pprl_engine::{PprlApi, PprlConfigBuilder, PprlRequest, PprlService, SensitiveField};
//!
//! let service = PprlService::new(PprlConfigBuilder::new().salt("shared").build()?)?;
//!
//! let request = PprlRequest::new("dmv", 0.8)
//!     .with_field(SensitiveField::exact("email", "a@b.com"))
//!     .with_field(SensitiveField::phonetic("surname", "Robert"));
//!
//! service.validate_pprl_request(&request)?;
//! let response = service.perform_pprl(&request, &candidates);
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    BloomFilter, DataProviderRecord, ExportedBloomFilter, FieldKind, FieldValue, FuzzyMatcher,
    HashScheme, PhoneticEncoder, PprlConfig, PprlConfigBuilder, SensitiveField,
};
pub use error::{DecodeError, PprlError, ValidationError};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{MatchMetadata, PprlApi, PprlRequest, PprlResponse};
pub use service::PprlService;
