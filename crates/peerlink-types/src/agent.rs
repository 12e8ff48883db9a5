//! Agent identity and status reporting types.

use crate::connection::Connection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name used when none is configured.
pub const DEFAULT_AGENT_NAME: &str = "PeerLink_Agent";

/// Who this agent is. Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub id: String,
    pub name: String,
}

impl AgentIdentity {
    /// Build an identity, generating a UUID when no ID is supplied.
    pub fn new(id: Option<String>, name: Option<String>) -> Self {
        Self {
            id: id
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: name
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string()),
        }
    }
}

/// Liveness flag reported by `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentLiveness {
    Active,
    Stopped,
}

impl std::fmt::Display for AgentLiveness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Point-in-time view of an agent, as served by `/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub agent_id: String,
    pub agent_name: String,
    pub status: AgentLiveness,
    pub connections: Vec<Connection>,
    /// Number of envelopes received so far (contents are not included).
    pub message_queue_count: usize,
    pub timestamp: DateTime<Utc>,
}
