//! # PPRL Broker Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Record generators shared by tests and benchmarks
//! └── integration/      # Cross-module scenarios
//!     ├── scenarios.rs      # End-to-end linkage outcomes
//!     └── wire_contract.rs  # JSON shapes seen by collaborators
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p pprl-tests
//!
//! # Benchmarks
//! cargo bench -p pprl-tests
//! ```

pub mod integration;
