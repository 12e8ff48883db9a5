//! Route handlers for the agent API.
//!
//! Peer-facing endpoints (`/handshake`, `/message`) are what other agents
//! call. Operator endpoints (`/connect`, `/send`, `/ping/{id}`) drive this
//! agent's outbound side. The rest are read-only views.

use crate::error::ApiError;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use peerlink_types::{HandshakeAck, HandshakeRequest, MessageEnvelope, StatusSnapshot};
use peerlink_wire::Agent;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

/// Shared handler state.
pub type AppState = Arc<Agent>;

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub target_agent_url: String,
    pub target_agent_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub target_agent_id: String,
    pub message_type: String,
    #[serde(default)]
    pub payload: Value,
}

// ── Peer-facing ────────────────────────────────────────────────────────────

/// POST /api/agent/handshake
pub async fn handshake(
    State(agent): State<AppState>,
    Json(request): Json<HandshakeRequest>,
) -> Json<HandshakeAck> {
    Json(agent.accept_handshake(&request))
}

/// POST /api/agent/message
pub async fn receive_message(
    State(agent): State<AppState>,
    Json(envelope): Json<MessageEnvelope>,
) -> Result<Json<Value>, ApiError> {
    match agent.receive_message(envelope).await {
        Ok(reply) => Ok(Json(reply)),
        Err(e) => {
            error!(error = %e, "Error processing message");
            Err(ApiError::Message(e))
        }
    }
}

// ── Operator ───────────────────────────────────────────────────────────────

/// POST /api/agent/connect
pub async fn connect(
    State(agent): State<AppState>,
    Json(request): Json<ConnectRequest>,
) -> Result<Json<Value>, ApiError> {
    if !agent
        .connect(&request.target_agent_url, &request.target_agent_id)
        .await
    {
        return Err(ApiError::Connect {
            target_agent_id: request.target_agent_id,
        });
    }
    Ok(Json(json!({
        "status": "connection_established",
        "target_agent_id": request.target_agent_id,
        "target_agent_url": request.target_agent_url,
        "timestamp": Utc::now(),
    })))
}

/// POST /api/agent/send
pub async fn send(
    State(agent): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Result<Json<Value>, ApiError> {
    let response = agent
        .send_message(
            &request.target_agent_id,
            &request.message_type,
            request.payload,
        )
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to send message");
            ApiError::Send(e)
        })?;
    Ok(Json(json!({
        "status": "message_sent",
        "response": response,
        "timestamp": Utc::now(),
    })))
}

/// POST /api/agent/ping/{target_agent_id}
///
/// A reply that is `null` or an empty object counts as a failed ping.
pub async fn ping(
    State(agent): State<AppState>,
    Path(target_agent_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let response = agent.ping(&target_agent_id).await.map_err(|e| {
        warn!(error = %e, "Ping failed");
        ApiError::Ping(e)
    })?;
    if response.is_null() || response.as_object().is_some_and(|o| o.is_empty()) {
        warn!(peer_id = %target_agent_id, "Ping got an empty reply");
        return Err(ApiError::EmptyPingReply { target_agent_id });
    }
    Ok(Json(json!({
        "status": "ping_sent",
        "response": response,
        "timestamp": Utc::now(),
    })))
}

// ── Read-only ──────────────────────────────────────────────────────────────

/// GET /api/agent/status
pub async fn status(State(agent): State<AppState>) -> Json<StatusSnapshot> {
    Json(agent.status())
}

/// GET /api/agent/connections
pub async fn connections(State(agent): State<AppState>) -> Json<Value> {
    let connections = agent.connections();
    Json(json!({
        "agent_id": agent.id(),
        "count": connections.len(),
        "connections": connections,
        "timestamp": Utc::now(),
    }))
}

/// GET /api/agent/messages
pub async fn messages(State(agent): State<AppState>) -> Json<Value> {
    let messages = agent.inbound_messages();
    Json(json!({
        "agent_id": agent.id(),
        "count": messages.len(),
        "messages": messages,
        "timestamp": Utc::now(),
    }))
}

/// GET /health
pub async fn health(State(agent): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "agent": {"id": agent.id(), "name": agent.name()},
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /
pub async fn root(State(agent): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "PeerLink agent",
        "version": env!("CARGO_PKG_VERSION"),
        "agent": {"id": agent.id(), "name": agent.name()},
        "endpoints": ["/health", peerlink_wire::AGENT_API_PREFIX],
        "timestamp": Utc::now(),
    }))
}
