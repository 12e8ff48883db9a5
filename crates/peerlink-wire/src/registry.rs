//! Connection registry. Tracks which peers this agent can reach.
//!
//! The [`ConnectionRegistry`] is a thread-safe map from peer ID to the
//! [`Connection`] recorded by the last successful handshake with that peer.
//! Records are only ever inserted or overwritten; there is no disconnect.

use peerlink_types::Connection;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe registry of known peer connections.
#[derive(Debug, Clone)]
pub struct ConnectionRegistry {
    connections: Arc<RwLock<HashMap<String, Connection>>>,
}

impl ConnectionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record a connection after a successful handshake.
    ///
    /// Last write wins: an existing record for the same peer ID is replaced
    /// and returned.
    pub fn upsert(&self, connection: Connection) -> Option<Connection> {
        let mut connections = self.connections.write().unwrap_or_else(|e| e.into_inner());
        connections.insert(connection.peer_id.clone(), connection)
    }

    /// Get a snapshot of a specific connection.
    pub fn get(&self, peer_id: &str) -> Option<Connection> {
        let connections = self.connections.read().unwrap_or_else(|e| e.into_inner());
        connections.get(peer_id).cloned()
    }

    /// Whether a connection exists for `peer_id`.
    pub fn contains(&self, peer_id: &str) -> bool {
        let connections = self.connections.read().unwrap_or_else(|e| e.into_inner());
        connections.contains_key(peer_id)
    }

    /// All connections, ordered by peer ID.
    pub fn all(&self) -> Vec<Connection> {
        let connections = self.connections.read().unwrap_or_else(|e| e.into_inner());
        let mut all: Vec<Connection> = connections.values().cloned().collect();
        all.sort_by(|a, b| a.peer_id.cmp(&b.peer_id));
        all
    }

    /// Number of known connections.
    pub fn len(&self) -> usize {
        let connections = self.connections.read().unwrap_or_else(|e| e.into_inner());
        connections.len()
    }

    /// Whether no connection has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
