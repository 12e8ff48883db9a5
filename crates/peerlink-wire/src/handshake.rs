//! Handshake: the one-shot exchange that establishes a connection record.
//!
//! The initiating side posts a [`HandshakeRequest`] to the peer's
//! `/api/agent/handshake` endpoint. Any 2xx answer counts as acceptance and
//! records a [`Connection`] for the caller-supplied peer ID. The peer's
//! self-reported identity in the reply is not checked against that ID.
//!
//! The receiving side answers with a [`HandshakeAck`] and records nothing.

use crate::registry::ConnectionRegistry;
use crate::transport::{endpoint_url, Transport};
use chrono::Utc;
use peerlink_types::message::HANDSHAKE_ACCEPTED;
use peerlink_types::{AgentIdentity, Connection, HandshakeAck, HandshakeRequest, TransportError};
use std::sync::Arc;
use tracing::{info, warn};

/// Performs outbound handshakes and answers inbound ones.
pub struct HandshakeCoordinator {
    identity: AgentIdentity,
    transport: Arc<dyn Transport>,
    registry: ConnectionRegistry,
}

impl HandshakeCoordinator {
    /// Create a coordinator that records successful handshakes in `registry`.
    pub fn new(
        identity: AgentIdentity,
        transport: Arc<dyn Transport>,
        registry: ConnectionRegistry,
    ) -> Self {
        Self {
            identity,
            transport,
            registry,
        }
    }

    /// Handshake with the agent at `peer_url` and record it as `peer_id`.
    ///
    /// Returns `false` on any failure; the registry is only touched on success.
    /// A single attempt is made.
    pub async fn connect(&self, peer_url: &str, peer_id: &str) -> bool {
        match self.handshake(peer_url).await {
            Ok(()) => {
                let previous = self
                    .registry
                    .upsert(Connection::connected(peer_id, peer_url));
                if let Some(old) = previous.filter(|old| old.peer_url != peer_url) {
                    info!(
                        peer_id = %peer_id,
                        old_url = %old.peer_url,
                        new_url = %peer_url,
                        "Replaced existing connection"
                    );
                }
                info!(peer_id = %peer_id, url = %peer_url, "Connected to agent");
                true
            }
            Err(e) => {
                warn!(peer_id = %peer_id, url = %peer_url, error = %e, "Handshake failed");
                false
            }
        }
    }

    /// Post a handshake request and check the answer's status.
    async fn handshake(&self, peer_url: &str) -> Result<(), TransportError> {
        let url = endpoint_url(peer_url, "/handshake");
        let request = HandshakeRequest {
            source_agent_id: self.identity.id.clone(),
            source_agent_name: self.identity.name.clone(),
            timestamp: Some(Utc::now()),
        };
        let body =
            serde_json::to_value(&request).map_err(|e| TransportError::Json(e.to_string()))?;

        let response = self.transport.post(&url, body).await?;
        if !response.is_success() {
            return Err(TransportError::Status {
                url,
                status: response.status,
            });
        }
        Ok(())
    }

    /// Answer an inbound handshake.
    pub fn acknowledge(&self, request: &HandshakeRequest) -> HandshakeAck {
        info!(
            from_id = %request.source_agent_id,
            from_name = %request.source_agent_name,
            "Handshake request received"
        );
        HandshakeAck {
            status: HANDSHAKE_ACCEPTED.to_string(),
            target_agent_id: self.identity.id.clone(),
            target_agent_name: self.identity.name.clone(),
            timestamp: Utc::now(),
        }
    }
}
