//! Scriptable in-memory transport for unit tests.

use crate::transport::{PeerResponse, Transport};
use async_trait::async_trait;
use peerlink_types::TransportError;
use std::sync::Mutex;

type Responder =
    Box<dyn Fn(&str, &serde_json::Value) -> Result<PeerResponse, TransportError> + Send + Sync>;

/// Records every post and answers with a scripted responder.
pub(crate) struct MockTransport {
    calls: Mutex<Vec<(String, serde_json::Value)>>,
    responder: Responder,
}

impl MockTransport {
    pub(crate) fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &serde_json::Value) -> Result<PeerResponse, TransportError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    /// Accepts handshakes and acknowledges messages by echoing their ID.
    pub(crate) fn accepting() -> Self {
        Self::new(|url, body| {
            let reply = if url.ends_with("/handshake") {
                serde_json::json!({"status": "handshake_accepted"})
            } else {
                serde_json::json!({"status": "received", "message_id": body["id"]})
            };
            Ok(PeerResponse::ok_json(&reply))
        })
    }

    /// Every call fails before a response arrives.
    pub(crate) fn unreachable() -> Self {
        Self::new(|_, _| Err(TransportError::Request("connection refused".into())))
    }

    /// Every call gets an empty response with the given status.
    pub(crate) fn with_status(status: u16) -> Self {
        Self::new(move |_, _| {
            Ok(PeerResponse {
                status,
                body: Vec::new(),
            })
        })
    }

    pub(crate) fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, url: &str, body: serde_json::Value) -> Result<PeerResponse, TransportError> {
        let result = (self.responder)(url, &body);
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((url.to_string(), body));
        result
    }
}
