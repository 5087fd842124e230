//! Shared Error Types
//!
//! Failures that can occur while reading from or writing to the remote store.
//!
//! # Error Categories
//!
//! - `Http` - The store answered with a non-2xx status
//! - `Network` - The request never produced a response (DNS, connectivity, TLS)
//! - `Validation` - A local precondition failed before any request was sent
//! - `Serialization` - A payload could not be encoded or decoded
//!
//! # Usage
//!
//! ```rust
//! use taskboard_sync::shared::RemoteError;
//!
//! let error = RemoteError::validation("id", "entity has no id");
//! assert!(error.to_string().contains("id"));
//! ```
use serde_json::Value;
use thiserror::Error;

/// Result alias for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote store failures
#[derive(Debug, Error, Clone)]
pub enum RemoteError {
    /// Non-2xx response
    #[error("{context} failed with HTTP {status}{}", detail_suffix(.detail))]
    Http {
        /// HTTP status code
        status: u16,
        /// What was being attempted, e.g. "load tasks"
        context: String,
        /// Human-readable detail extracted from the response body
        detail: Option<String>,
        /// Parsed response body, if it was JSON
        payload: Option<Value>,
    },

    /// Transport failure before a response arrived
    #[error("{context}: network error: {message}")]
    Network {
        /// What was being attempted
        context: String,
        /// Lower-level cause
        message: String,
    },

    /// Local precondition not met
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// JSON encoding or decoding failure
    #[error("Serialization error: {message}")]
    Serialization {
        /// Human-readable error message
        message: String,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => format!(": {}", detail),
        _ => String::new(),
    }
}

impl RemoteError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// HTTP status, for `Http` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Context label attached at classification time
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Http { context, .. } | Self::Network { context, .. } => Some(context),
            _ => None,
        }
    }

    /// True when the request never got an HTTP response
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
