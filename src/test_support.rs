//! Test doubles shared by the unit tests

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::offline::SaveControl;
use crate::remote::{ErrorPolicy, Method, RemoteRequest, RemoteResponse, RemoteStore, Transport, TransportError};

type Responder = Box<dyn Fn(&RemoteRequest) -> Result<RemoteResponse, TransportError> + Send + Sync>;

/// Transport that records requests and answers from a closure
pub(crate) struct ScriptedTransport {
    requests: Mutex<Vec<RemoteRequest>>,
    responder: Responder,
}

impl ScriptedTransport {
    pub(crate) fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&RemoteRequest) -> Result<RemoteResponse, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Same JSON answer for every request
    pub(crate) fn always(status: u16, body: Value) -> Arc<Self> {
        let body = body.to_string();
        Self::new(move |_| Ok(RemoteResponse::new(status, body.clone())))
    }

    pub(crate) fn raw(status: u16, body: &str) -> Arc<Self> {
        let body = body.to_string();
        Self::new(move |_| Ok(RemoteResponse::new(status, body.clone())))
    }

    /// Every request fails at the transport level
    pub(crate) fn failing(message: &str) -> Arc<Self> {
        let message = message.to_string();
        Self::new(move |_| Err(TransportError::new(message.clone())))
    }

    /// Requests with `method` fail with HTTP 500, the rest succeed
    pub(crate) fn failing_on(method: Method) -> Arc<Self> {
        Self::new(move |request| {
            if request.method == method {
                Ok(RemoteResponse::new(500, r#"{"error": "internal"}"#))
            } else {
                Ok(RemoteResponse::new(200, "null"))
            }
        })
    }

    /// Answer without recording, for wrapping one transport in another
    pub(crate) fn respond(&self, request: &RemoteRequest) -> Result<RemoteResponse, TransportError> {
        (self.responder)(request)
    }

    pub(crate) fn requests(&self) -> Vec<RemoteRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: Method) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: RemoteRequest) -> Result<RemoteResponse, TransportError> {
        let response = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }
}

/// Message sink that keeps everything it was asked to render
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl crate::remote::MessageSink for RecordingSink {
    fn render(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Save button stand-in recording every enable/disable
#[derive(Debug, Default)]
pub(crate) struct RecordingControl {
    states: Mutex<Vec<bool>>,
}

impl RecordingControl {
    pub(crate) fn states(&self) -> Vec<bool> {
        self.states.lock().unwrap().clone()
    }
}

impl SaveControl for RecordingControl {
    fn set_enabled(&self, enabled: bool) {
        self.states.lock().unwrap().push(enabled);
    }
}

/// Adapter over `transport` whose user messages land in the returned sink
pub(crate) fn remote_with(transport: Arc<ScriptedTransport>) -> (RemoteStore, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let policy = ErrorPolicy::new().with_toast(sink.clone());
    let remote = RemoteStore::new(transport, "https://board.test", Arc::new(policy));
    (remote, sink)
}
