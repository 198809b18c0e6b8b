//! Service Layer
//!
//! Contains the application service that orchestrates domain logic
//! behind the inbound port.

pub mod pprl_service;

pub use pprl_service::PprlService;
