//! Mock store helpers for integration tests
//!
//! Every helper starts a fresh `wiremock` server, so tests never share state.

use serde_json::Value;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskboard_sync::remote::{ErrorPolicy, HttpTransport, MessageSink, RemoteStore};
use taskboard_sync::shared::{EntityId, Task};

/// Collects every user-facing message
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl MessageSink for RecordingSink {
    fn render(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// A mock server plus an adapter pointed at it
pub struct MockStore {
    pub server: MockServer,
    pub remote: RemoteStore,
    pub sink: Arc<RecordingSink>,
}

impl MockStore {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let (remote, sink) = remote_for(&server.uri());
        Self { server, remote, sink }
    }

    /// Answer `verb` on `route` with `status` and a JSON body
    pub async fn respond(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Method and path of every request the server saw, in order
    pub async fn calls(&self) -> Vec<(String, String)> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| (r.method.to_string(), r.url.path().to_string()))
            .collect()
    }

    pub async fn calls_with(&self, verb: &str) -> usize {
        self.calls().await.iter().filter(|(m, _)| m == verb).count()
    }
}

/// HTTP adapter for `base_url` whose messages land in the returned sink
pub fn remote_for(base_url: &str) -> (RemoteStore, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let policy = ErrorPolicy::new().with_toast(sink.clone());
    let remote = RemoteStore::new(Arc::new(HttpTransport::default()), base_url, Arc::new(policy));
    (remote, sink)
}

pub fn task(id: EntityId, title: &str) -> Task {
    let mut task = Task::new(title);
    task.id = Some(id);
    task
}
