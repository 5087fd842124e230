//! # Error Policy
//!
//! One place that turns transport outcomes into [`RemoteError`]s and one channel
//! for the messages the user gets to see.
//!
//! ## Features
//!
//! - **Classification**: HTTP failures keep status, context and the parsed body;
//!   network failures keep context and cause
//! - **Single message channel**: a page-specific renderer when one is installed,
//!   otherwise a generic transient toast
//! - **Safe reads**: failed loads become an empty [`SafeLoad`] instead of an error
//!
//! Raw transport errors never reach the user. They are logged in full and
//! replaced by a short actionable message.

use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;

use crate::remote::safe_load::{LoadOptions, SafeLoad};
use crate::shared::error::RemoteError;

/// Shown when a flush fails
pub const SAVE_FAILED_MESSAGE: &str = "Could not save task changes. Please try again.";

/// Shown when a load fails and the caller supplied no message
pub const LOAD_FAILED_MESSAGE: &str = "Could not load data. Please try again.";

/// Somewhere a user-visible message can be rendered
pub trait MessageSink: Send + Sync {
    fn render(&self, message: &str);
}

/// Generic transient toast; emits the message as a `user_message` event
#[derive(Debug, Default, Clone, Copy)]
pub struct ToastSink;

impl MessageSink for ToastSink {
    fn render(&self, message: &str) {
        tracing::warn!(target: "user_message", "{}", message);
    }
}

/// Failure classification and the user message channel
pub struct ErrorPolicy {
    page_renderer: Option<Arc<dyn MessageSink>>,
    toast: Arc<dyn MessageSink>,
}

impl std::fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorPolicy")
            .field("page_renderer", &self.page_renderer.is_some())
            .finish()
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorPolicy {
    /// Policy that renders every message as a toast
    pub fn new() -> Self {
        Self {
            page_renderer: None,
            toast: Arc::new(ToastSink),
        }
    }

    /// Prefer `renderer` over the toast
    pub fn with_page_renderer(mut self, renderer: Arc<dyn MessageSink>) -> Self {
        self.page_renderer = Some(renderer);
        self
    }

    /// Replace the fallback toast
    pub fn with_toast(mut self, toast: Arc<dyn MessageSink>) -> Self {
        self.toast = toast;
        self
    }

    /// Surface `message` to the user. Blank messages are dropped.
    pub fn show_user_message(&self, message: &str) {
        let message = message.trim();
        if message.is_empty() {
            return;
        }
        match &self.page_renderer {
            Some(renderer) => renderer.render(message),
            None => self.toast.render(message),
        }
    }

    /// Log a failed read, tell the user unless silenced, and return an empty result
    pub fn handle_safe_read_failure<T>(&self, error: RemoteError, options: &LoadOptions) -> SafeLoad<T> {
        tracing::error!("[SYNC] {} failed: {}", options.context, error);
        if !options.silent {
            self.show_user_message(options.error_message.as_deref().unwrap_or(LOAD_FAILED_MESSAGE));
        }
        SafeLoad::failed(error)
    }
}

/// Build an error for a non-2xx response.
///
/// The body is parsed as JSON when possible; `message` or `error` fields become
/// the human-readable detail.
pub fn classify_http_failure(status: u16, context: &str, body: &str) -> RemoteError {
    let payload = serde_json::from_str::<Value>(body).ok().filter(|v| !v.is_null());
    let detail = payload.as_ref().and_then(extract_detail);
    RemoteError::Http {
        status,
        context: context.to_string(),
        detail,
        payload,
    }
}

/// Wrap a transport failure with what was being attempted
pub fn classify_network_failure(context: &str, cause: impl Display) -> RemoteError {
    RemoteError::Network {
        context: context.to_string(),
        message: cause.to_string(),
    }
}

fn extract_detail(payload: &Value) -> Option<String> {
    ["message", "error"].iter().find_map(|key| match payload.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        // Firebase nests `{ "error": { "message": ... } }` in some responses
        Some(Value::Object(inner)) => inner
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}
