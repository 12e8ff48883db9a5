//! Outbound transport seam.
//!
//! The core only needs "post a JSON body to a URL and hand back what came
//! back". [`HttpTransport`] does that with reqwest; tests substitute their
//! own [`Transport`] implementation.

use async_trait::async_trait;
use peerlink_types::TransportError;
use std::time::Duration;
use tracing::debug;

/// Default timeout for outbound peer calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A response from a peer, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl PeerResponse {
    /// Build a 200 response carrying a JSON body.
    pub fn ok_json(body: &serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string().into_bytes(),
        }
    }

    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON. An empty body parses as `null`.
    pub fn json(&self) -> Result<serde_json::Value, TransportError> {
        if self.body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&self.body).map_err(|e| TransportError::Json(e.to_string()))
    }
}

/// Capability to post a JSON body to a peer.
///
/// Implementations return `Ok` for every HTTP response, whatever its status;
/// `Err` is reserved for requests that produced no response at all.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// POST `body` as JSON to `url`.
    async fn post(&self, url: &str, body: serde_json::Value) -> Result<PeerResponse, TransportError>;
}

/// reqwest-backed transport used in production.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(concat!("PeerLink/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, body: serde_json::Value) -> Result<PeerResponse, TransportError> {
        debug!(url = %url, "POST to peer");

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(PeerResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Build the URL of an agent API endpoint on a peer.
///
/// `base` is the peer URL as given to `connect`; a trailing `/` is ignored.
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!(
        "{}{}{}",
        base.trim_end_matches('/'),
        crate::AGENT_API_PREFIX,
        path
    )
}
