//! PeerLink protocol core.
//!
//! An agent connects to peers with a handshake, sends typed JSON envelopes to
//! peers it is connected to, and answers envelopes posted to it through a
//! handler table keyed by message type.
//!
//! ## Modules
//!
//! - [`agent`]: the [`Agent`] façade the HTTP layer drives
//! - [`handshake`]: outbound connect and inbound acknowledgement
//! - [`registry`]: peer ID → connection record
//! - [`dispatch`]: message-type routing and the built-in handlers
//! - [`queue`]: append-only record of received envelopes
//! - [`transport`]: the outbound HTTP seam
//! - [`provider`]: datasets served to `data_request`

pub mod agent;
pub mod dispatch;
pub mod handshake;
pub mod provider;
pub mod queue;
pub mod registry;
pub mod transport;

#[cfg(test)]
mod testing;

/// Path prefix under which every agent endpoint is mounted.
pub const AGENT_API_PREFIX: &str = "/api/agent";

pub use agent::{Agent, AgentBuilder};
pub use dispatch::{Dispatcher, FnHandler, MessageHandler};
pub use handshake::HandshakeCoordinator;
pub use provider::{DataProvider, SampleDataProvider};
pub use queue::InboundQueue;
pub use registry::ConnectionRegistry;
pub use transport::{HttpTransport, PeerResponse, Transport};
