//! Ports Layer
//!
//! Defines the driving port (inbound API) of the engine. The engine has no
//! driven ports: candidates arrive in memory and nothing is persisted.

pub mod inbound;

pub use inbound::{MatchMetadata, PprlApi, PprlRequest, PprlResponse};
