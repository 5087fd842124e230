//! Common test utilities and helpers
//!
//! - Mock store (a `wiremock` server speaking the collection REST shape)
//! - Recording message sink
//! - Custom assertion macros

pub mod assertions;
pub mod mock_store;

// Re-export commonly used utilities
pub use mock_store::*;
