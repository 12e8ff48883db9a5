//! Mapping from agent failures to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use peerlink_types::AgentError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by the agent API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Handshake with the requested peer failed.
    #[error("Failed to establish connection with {target_agent_id}")]
    Connect { target_agent_id: String },

    /// An outbound send failed, including sends to unknown peers.
    #[error("Failed to send message")]
    Send(#[source] AgentError),

    /// An outbound ping failed.
    #[error("Ping failed")]
    Ping(#[source] AgentError),

    /// The peer answered a ping with an empty body.
    #[error("Ping failed")]
    EmptyPingReply { target_agent_id: String },

    /// A handler failed on an inbound envelope.
    #[error("Failed to process message")]
    Message(#[source] AgentError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Connect { target_agent_id } => (
                StatusCode::BAD_REQUEST,
                json!({"error": self.to_string(), "target_agent_id": target_agent_id}),
            ),
            ApiError::Send(e) | ApiError::Ping(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": self.to_string(), "message": e.to_string()}),
            ),
            ApiError::EmptyPingReply { target_agent_id } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": self.to_string(),
                    "message": format!("Empty reply from {target_agent_id}"),
                }),
            ),
            ApiError::Message(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": e.to_string(), "message_id": e.message_id()}),
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerlink_types::HandlerError;

    #[test]
    fn test_connect_is_bad_request() {
        let resp = ApiError::Connect {
            target_agent_id: "peer-a".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_send_and_handler_are_server_errors() {
        let send = ApiError::Send(AgentError::NotConnected("peer-a".into())).into_response();
        assert_eq!(send.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let handler = ApiError::Message(AgentError::Handler {
            message_id: "m1".into(),
            source: HandlerError("boom".into()),
        })
        .into_response();
        assert_eq!(handler.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
