//! Shared Module
//!
//! Types shared by every layer of the crate: the entities stored in the remote
//! collections, the application configuration and the error types.
//!
//! # Overview
//!
//! All entity types serialize to the same JSON shape the remote store holds, so
//! a value read from the store can be written back unchanged.

/// Entity trait and identifier handling
pub mod entity;

/// Task records
pub mod task;

/// Contact records
pub mod contact;

/// Error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use contact::Contact;
pub use entity::{Entity, EntityId, IntoEntityId, MAX_SAFE_FLOAT_ID};
pub use error::{RemoteError, RemoteResult};
pub use task::{Category, Priority, Subtask, Task, TaskStatus};
