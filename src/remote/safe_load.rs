//! Non-failing read results
//!
//! Every collection read returns a [`SafeLoad`] instead of a `Result`. A failed
//! read carries its error and no data, so "the collection is empty" and "the
//! load failed" stay distinguishable: check [`SafeLoad::error`] before trusting
//! an empty [`SafeLoad::data`].

use crate::shared::error::RemoteError;

/// Outcome of a collection read
#[derive(Debug, Clone)]
pub struct SafeLoad<T> {
    data: Vec<T>,
    error: Option<RemoteError>,
}

impl<T> SafeLoad<T> {
    /// Successful read
    pub fn loaded(data: Vec<T>) -> Self {
        Self { data, error: None }
    }

    /// Failed read; always empty
    pub fn failed(error: RemoteError) -> Self {
        Self {
            data: Vec::new(),
            error: Some(error),
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn error(&self) -> Option<&RemoteError> {
        self.error.as_ref()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_parts(self) -> (Vec<T>, Option<RemoteError>) {
        (self.data, self.error)
    }

    pub fn into_result(self) -> Result<Vec<T>, RemoteError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}

/// Options for a collection read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Label for logs and error contexts, e.g. "load tasks"
    pub context: String,
    /// Message shown to the user on failure
    pub error_message: Option<String>,
    /// Suppress the user message on failure
    pub silent: bool,
}

impl LoadOptions {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            error_message: None,
            silent: false,
        }
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }
}
