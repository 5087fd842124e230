//! Application configuration module
//!
//! Provides the configuration for the remote store: where it lives, which
//! collection paths hold tasks and contacts, and the optional auth token.
//!
//! Values are layered, lowest precedence first:
//!
//! 1. built-in defaults (`tasks`, `users`)
//! 2. a TOML file (`<config dir>/taskboard/config.toml` unless a path is given)
//! 3. `TASKBOARD_*` environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default collection path for tasks
pub const DEFAULT_TASKS_PATH: &str = "tasks";
/// Default collection path for contacts
pub const DEFAULT_USERS_PATH: &str = "users";

const ENV_BASE_URL: &str = "TASKBOARD_BASE_URL";
const ENV_TASKS_PATH: &str = "TASKBOARD_TASKS_PATH";
const ENV_USERS_PATH: &str = "TASKBOARD_USERS_PATH";
const ENV_AUTH_TOKEN: &str = "TASKBOARD_AUTH_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Root URL of the store, e.g. `https://<project>.firebaseio.com/`
    pub base_url: String,
    /// Collection path for tasks
    pub tasks_path: String,
    /// Collection path for contacts
    pub users_path: String,
    /// Appended as `?auth=` to every request when set
    pub auth_token: Option<String>,
    /// Per-request timeout; the HTTP client default applies when unset
    pub request_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            tasks_path: DEFAULT_TASKS_PATH.to_string(),
            users_path: DEFAULT_USERS_PATH.to_string(),
            auth_token: None,
            request_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::MissingValue("base_url"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.base_url.clone()));
        }
        if self.tasks_path.trim_matches('/').trim().is_empty() {
            return Err(ConfigError::MissingValue("tasks_path"));
        }
        if self.users_path.trim_matches('/').trim().is_empty() {
            return Err(ConfigError::MissingValue("users_path"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// `<config dir>/taskboard/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskboard").join("config.toml"))
    }

    /// Parse a TOML config file without applying overrides or validating
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from the default file location (if present) plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        Self::load_from(path.as_deref())
    }

    /// Load from `path` (skipped when it does not exist) plus the environment
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(path)?
            }
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `TASKBOARD_*` overrides from `lookup`; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(path) = get(ENV_TASKS_PATH) {
            self.tasks_path = path;
        }
        if let Some(path) = get(ENV_USERS_PATH) {
            self.users_path = path;
        }
        if let Some(token) = get(ENV_AUTH_TOKEN) {
            self.auth_token = Some(token);
        }
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    base_url: Option<String>,
    tasks_path: Option<String>,
    users_path: Option<String>,
    auth_token: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl AppConfigBuilder {
    /// Set the store URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn tasks_path(mut self, path: impl Into<String>) -> Self {
        self.tasks_path = Some(path.into());
        self
    }

    pub fn users_path(mut self, path: impl Into<String>) -> Self {
        self.users_path = Some(path.into());
        self
    }

    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            base_url: self.base_url.ok_or(ConfigError::MissingValue("base_url"))?,
            tasks_path: self.tasks_path.unwrap_or(defaults.tasks_path),
            users_path: self.users_path.unwrap_or(defaults.users_path),
            auth_token: self.auth_token,
            request_timeout_secs: self.request_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("could not read {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
    #[error("invalid config file: {0}")]
    Parse(String),
}
