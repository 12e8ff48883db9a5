//! HTTP surface for a PeerLink agent.
//!
//! Exposes an [`peerlink_wire::Agent`] over REST: peer-facing handshake and
//! message endpoints, operator endpoints that drive outbound traffic, and
//! read-only status views.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server};
