//! # Remote Collection Adapter
//!
//! Reads and writes entity collections in a Firebase Realtime-Database-style
//! REST store.
//!
//! ## Architecture
//!
//! - `transport.rs`: the `Transport` seam and its `reqwest` implementation
//! - `url.rs`: collection and entity URLs
//! - `normalize.rs`: array / object / null payloads to a dense list
//! - `policy.rs`: failure classification and the user message channel
//! - `safe_load.rs`: the non-failing read result
//!
//! ## Wire format
//!
//! | Operation           | Request                                   |
//! |---------------------|-------------------------------------------|
//! | `load_collection`   | `GET {base}{path}.json`                   |
//! | `set_entity`        | `PUT {base}{path}/{id}.json` (entity)     |
//! | `patch_collection`  | `PATCH {base}{path}.json` (`{id: value}`) |
//! | `delete_entity`     | `DELETE {base}{path}/{id}.json`           |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskboard_sync::remote::{ErrorPolicy, HttpTransport, LoadOptions, RemoteStore};
//! use taskboard_sync::shared::Task;
//!
//! # async fn example() {
//! let remote = RemoteStore::new(
//!     Arc::new(HttpTransport::default()),
//!     "https://board.example.com/",
//!     Arc::new(ErrorPolicy::new()),
//! );
//! let tasks = remote
//!     .load_collection::<Task>("tasks", &LoadOptions::new("load tasks"))
//!     .await;
//! if let Some(error) = tasks.error() {
//!     eprintln!("board unavailable: {}", error);
//! }
//! # }
//! ```

pub mod normalize;
pub mod policy;
pub mod safe_load;
pub mod transport;
pub mod url;

pub use normalize::{decode_entities, normalize_payload};
pub use policy::{
    classify_http_failure, classify_network_failure, ErrorPolicy, MessageSink, ToastSink,
    LOAD_FAILED_MESSAGE, SAVE_FAILED_MESSAGE,
};
pub use safe_load::{LoadOptions, SafeLoad};
pub use transport::{HttpTransport, Method, RemoteRequest, RemoteResponse, Transport, TransportError};
pub use url::StoreUrls;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::shared::config::AppConfig;
use crate::shared::entity::{Entity, EntityId};
use crate::shared::error::{RemoteError, RemoteResult};

/// Adapter over one remote store
#[derive(Clone)]
pub struct RemoteStore {
    transport: Arc<dyn Transport>,
    urls: StoreUrls,
    policy: Arc<ErrorPolicy>,
}

impl std::fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore").field("base", &self.urls.base()).finish()
    }
}

impl RemoteStore {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str, policy: Arc<ErrorPolicy>) -> Self {
        Self {
            transport,
            urls: StoreUrls::new(base_url, None),
            policy,
        }
    }

    /// HTTP-backed adapter built from configuration
    pub fn from_config(config: &AppConfig, policy: Arc<ErrorPolicy>) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config.request_timeout())?;
        Ok(Self {
            transport: Arc::new(transport),
            urls: StoreUrls::new(&config.base_url, config.auth_token.as_deref()),
            policy,
        })
    }

    /// Send `?auth=<token>` with every request
    pub fn with_auth_token(mut self, token: &str) -> Self {
        self.urls = StoreUrls::new(self.urls.base(), Some(token));
        self
    }

    pub fn policy(&self) -> &ErrorPolicy {
        &self.policy
    }

    pub fn urls(&self) -> &StoreUrls {
        &self.urls
    }

    /// Read a collection. Never fails; see [`SafeLoad`].
    pub async fn load_collection<T: DeserializeOwned>(&self, path: &str, options: &LoadOptions) -> SafeLoad<T> {
        let url = self.urls.collection(path);
        match self.send(Method::Get, url, None, &options.context).await {
            Ok(payload) => {
                let entries = normalize_payload(payload);
                let items = decode_entities(entries, &options.context);
                tracing::debug!("[SYNC] {}: {} entries", options.context, items.len());
                SafeLoad::loaded(items)
            }
            Err(error) => self.policy.handle_safe_read_failure(error, options),
        }
    }

    /// PUT one entity under its id. Fails before sending when the id is unset.
    pub async fn set_entity<T: Entity>(&self, entity: &T, path: &str) -> RemoteResult<()> {
        let id = entity
            .id()
            .ok_or_else(|| RemoteError::validation("id", format!("{} has no id", T::KIND)))?;
        let body = serde_json::to_value(entity)?;
        let url = self.urls.entity(path, &id.to_string());
        self.send(Method::Put, url, Some(body), &format!("save {} {}", T::KIND, id))
            .await
            .map(|_| ())
    }

    /// PATCH several entries in one call; `None` writes `null` (delete-by-patch)
    pub async fn patch_collection(&self, patch: &BTreeMap<EntityId, Option<Value>>, path: &str) -> RemoteResult<()> {
        let body: Map<String, Value> = patch
            .iter()
            .map(|(id, value)| (id.to_string(), value.clone().unwrap_or(Value::Null)))
            .collect();
        let url = self.urls.collection(path);
        self.send(Method::Patch, url, Some(Value::Object(body)), &format!("patch {}", path))
            .await
            .map(|_| ())
    }

    /// DELETE one entity
    pub async fn delete_entity(&self, id: EntityId, path: &str) -> RemoteResult<()> {
        let url = self.urls.entity(path, &id.to_string());
        self.send(Method::Delete, url, None, &format!("delete {}/{}", path, id))
            .await
            .map(|_| ())
    }

    async fn send(&self, method: Method, url: String, body: Option<Value>, context: &str) -> RemoteResult<Value> {
        tracing::debug!("{} {}", method.as_str(), url);
        let request = RemoteRequest { method, url, body };
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| classify_network_failure(context, e))?;

        if !response.is_success() {
            return Err(classify_http_failure(response.status, context, &response.body));
        }
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body)
            .map_err(|e| RemoteError::serialization(format!("{}: invalid JSON response: {}", context, e)))
    }
}
