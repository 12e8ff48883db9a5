//! Envelope and handshake types exchanged between agents.
//!
//! Envelopes travel as plain JSON bodies over HTTP. Field names are
//! snake_case on the wire.

use crate::serde_compat::{optional_string_lenient, string_lenient, timestamp_lenient};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Built-in message type answered with a pong.
pub const MSG_PING: &str = "ping";
/// Built-in message type asking the receiver for a dataset.
pub const MSG_DATA_REQUEST: &str = "data_request";
/// Built-in message type carrying a dataset back to the requester.
pub const MSG_DATA_RESPONSE: &str = "data_response";

/// The immutable unit of exchange between agents.
///
/// Every field has a serde default, so any JSON object deserializes into an
/// envelope. Outbound envelopes are only built through [`MessageEnvelope::outbound`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// Unique message ID, assigned by the sender.
    #[serde(default, deserialize_with = "string_lenient")]
    pub id: String,
    /// The agent that built the envelope.
    #[serde(default, deserialize_with = "string_lenient")]
    pub source_agent_id: String,
    /// The intended recipient, if the sender named one.
    #[serde(default, deserialize_with = "optional_string_lenient")]
    pub target_agent_id: Option<String>,
    /// Routing key for the dispatcher.
    #[serde(default, deserialize_with = "string_lenient")]
    pub message_type: String,
    /// Arbitrary structured payload.
    #[serde(default)]
    pub payload: serde_json::Value,
    /// When the sender built the envelope.
    #[serde(default, deserialize_with = "timestamp_lenient")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl MessageEnvelope {
    /// Build an outbound envelope with a fresh ID and the current time.
    pub fn outbound(
        source_agent_id: impl Into<String>,
        target_agent_id: impl Into<String>,
        message_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_agent_id: source_agent_id.into(),
            target_agent_id: Some(target_agent_id.into()),
            message_type: message_type.into(),
            payload,
            timestamp: Some(Utc::now()),
        }
    }

    /// Look up a string field of an object payload.
    ///
    /// Returns `None` when the payload is not an object, the key is absent,
    /// or the value is not a string.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|v| v.as_str())
    }
}

/// An envelope as stored in the inbound queue.
///
/// The envelope is stored as decoded, not as the peer sent it: a numeric or
/// boolean `id` is kept as its string form, and a `timestamp` that is not a
/// parseable datetime is stored as `null`. The payload is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedEnvelope {
    #[serde(flatten)]
    pub envelope: MessageEnvelope,
    /// When this process accepted the envelope.
    pub received_at: DateTime<Utc>,
}

/// Body of a handshake POST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakeRequest {
    #[serde(default, deserialize_with = "string_lenient")]
    pub source_agent_id: String,
    #[serde(default, deserialize_with = "string_lenient")]
    pub source_agent_name: String,
    /// Sender's clock; naive ISO-8601 times are read as UTC.
    #[serde(default, deserialize_with = "timestamp_lenient")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Body of a successful handshake reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakeAck {
    /// Always `"handshake_accepted"`.
    pub status: String,
    pub target_agent_id: String,
    pub target_agent_name: String,
    pub timestamp: DateTime<Utc>,
}

/// Status string of an accepted handshake.
pub const HANDSHAKE_ACCEPTED: &str = "handshake_accepted";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_envelope_fields() {
        let env = MessageEnvelope::outbound(
            "agent-a",
            "agent-b",
            MSG_PING,
            serde_json::json!({"message": "hi"}),
        );
        assert!(!env.id.is_empty());
        assert_eq!(env.source_agent_id, "agent-a");
        assert_eq!(env.target_agent_id.as_deref(), Some("agent-b"));
        assert_eq!(env.message_type, "ping");
        assert!(env.timestamp.is_some());
    }

    #[test]
    fn test_outbound_ids_are_unique() {
        let ids: std::collections::HashSet<String> = (0..1000)
            .map(|_| MessageEnvelope::outbound("a", "b", "x", serde_json::Value::Null).id)
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_envelope_wire_format_is_snake_case() {
        let env = MessageEnvelope::outbound("a", "b", "data_request", serde_json::json!({}));
        let json = serde_json::to_value(&env).unwrap();
        assert!(json.get("source_agent_id").is_some());
        assert!(json.get("target_agent_id").is_some());
        assert!(json.get("message_type").is_some());
    }

    #[test]
    fn test_empty_object_is_an_envelope() {
        let env: MessageEnvelope = serde_json::from_str("{}").unwrap();
        assert!(env.id.is_empty());
        assert!(env.message_type.is_empty());
        assert!(env.target_agent_id.is_none());
        assert!(env.payload.is_null());
        assert!(env.timestamp.is_none());
    }

    #[test]
    fn test_envelope_from_foreign_peer() {
        let raw = r#"{
            "id": "m1",
            "source_agent_id": "agent-py-001",
            "target_agent_id": "agent-rs-001",
            "message_type": "data_request",
            "payload": {"data_type": "user_data"},
            "timestamp": "2024-06-01T10:30:00.123456"
        }"#;
        let env: MessageEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(env.id, "m1");
        assert_eq!(env.payload_str("data_type"), Some("user_data"));
        assert!(env.timestamp.is_some());
    }

    #[test]
    fn test_payload_str_on_non_object() {
        let env = MessageEnvelope::outbound("a", "b", "x", serde_json::json!([1, 2]));
        assert_eq!(env.payload_str("data_type"), None);
    }

    #[test]
    fn test_queued_envelope_flattens() {
        let queued = QueuedEnvelope {
            envelope: MessageEnvelope::outbound("a", "b", "ping", serde_json::Value::Null),
            received_at: Utc::now(),
        };
        let json = serde_json::to_value(&queued).unwrap();
        assert_eq!(json["message_type"], "ping");
        assert!(json.get("received_at").is_some());
    }

    #[test]
    fn test_handshake_request_naive_timestamp() {
        let raw = r#"{"source_agent_id": "agent-py-001", "source_agent_name": "py", "timestamp": "2024-06-01T10:30:00.5"}"#;
        let req: HandshakeRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.source_agent_id, "agent-py-001");
        assert!(req.timestamp.is_some());
    }

    #[test]
    fn test_queued_envelope_holds_normalized_fields() {
        let raw = r#"{"id": 42, "source_agent_id": "peer", "message_type": "ping",
                      "payload": {"n": [1, 2]}, "timestamp": "yesterday"}"#;
        let queued = QueuedEnvelope {
            envelope: serde_json::from_str(raw).unwrap(),
            received_at: Utc::now(),
        };
        let json = serde_json::to_value(&queued).unwrap();
        assert_eq!(json["id"], "42");
        assert!(json["timestamp"].is_null());
        assert_eq!(json["payload"], serde_json::json!({"n": [1, 2]}));
    }
}
