//! Cross-module integration tests

pub mod scenarios;
pub mod wire_contract;
