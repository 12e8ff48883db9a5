//! Shared error types for the PeerLink system.

use thiserror::Error;

/// Failure of an outbound HTTP call to a peer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (unreachable peer, timeout, TLS).
    #[error("Request failed: {0}")]
    Request(String),

    /// The peer answered with a non-success status code.
    #[error("Peer at {url} returned HTTP {status}")]
    Status {
        /// The URL that was posted to.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// A body could not be encoded to, or decoded from, JSON.
    #[error("Invalid JSON body: {0}")]
    Json(String),
}

/// Failure raised by a message handler.
///
/// Built-in handlers never fail; custom handlers use this to report a
/// problem that should surface to the sending peer as an HTTP 500.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Handler failed: {0}")]
pub struct HandlerError(pub String);

/// Errors surfaced by the agent façade.
#[derive(Error, Debug)]
pub enum AgentError {
    /// No connection record exists for the target peer.
    #[error("No connection found for agent {0}")]
    NotConnected(String),

    /// The outbound post to a connected peer failed.
    #[error("Failed to send message to {peer_id}: {source}")]
    SendFailed {
        /// The peer the message was addressed to.
        peer_id: String,
        /// The transport failure.
        #[source]
        source: TransportError,
    },

    /// A handler failed while processing an inbound envelope.
    #[error("Failed to process message {message_id}: {source}")]
    Handler {
        /// ID of the envelope being processed.
        message_id: String,
        /// The handler failure.
        #[source]
        source: HandlerError,
    },
}

impl AgentError {
    /// The inbound message ID this error relates to, if any.
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::Handler { message_id, .. } => Some(message_id),
            _ => None,
        }
    }
}

/// Alias for results returned by the agent façade.
pub type AgentResult<T> = Result<T, AgentError>;
