//! Core types for the PeerLink agent-to-agent protocol.
//!
//! This crate defines the data structures shared by the protocol core
//! (`peerlink-wire`), the HTTP surface (`peerlink-api`) and the binary.
//! It contains no I/O and no business logic.

pub mod agent;
pub mod config;
pub mod connection;
pub mod error;
pub mod message;
pub mod serde_compat;

pub use agent::{AgentIdentity, AgentLiveness, StatusSnapshot};
pub use config::{AgentConfig, LogFormat};
pub use connection::{Connection, ConnectionStatus};
pub use error::{AgentError, AgentResult, HandlerError, TransportError};
pub use message::{HandshakeAck, HandshakeRequest, MessageEnvelope, QueuedEnvelope};
