//! Connection records kept by the registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connection state of a peer.
///
/// A record only exists after a successful handshake and is never removed,
/// so `Connected` is the only state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Handshake completed.
    Connected,
}

/// This process's record that a peer is reachable at a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Caller-asserted peer identifier (the registry key).
    pub peer_id: String,
    /// Base URL of the peer's agent API.
    pub peer_url: String,
    pub status: ConnectionStatus,
    /// Set when the handshake completed. Not refreshed by later traffic.
    pub last_ping: DateTime<Utc>,
}

impl Connection {
    /// A freshly handshaked connection.
    pub fn connected(peer_id: impl Into<String>, peer_url: impl Into<String>) -> Self {
        Self {
            peer_id: peer_id.into(),
            peer_url: peer_url.into(),
            status: ConnectionStatus::Connected,
            last_ping: Utc::now(),
        }
    }
}
