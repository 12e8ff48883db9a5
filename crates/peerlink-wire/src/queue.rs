//! Append-only inbound queue.

use chrono::Utc;
use peerlink_types::{MessageEnvelope, QueuedEnvelope};
use std::sync::Mutex;

/// Every envelope this agent has received, in arrival order.
///
/// Nothing is ever removed and envelopes are not deduplicated by ID.
#[derive(Debug, Default)]
pub struct InboundQueue {
    entries: Mutex<Vec<QueuedEnvelope>>,
}

impl InboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `envelope` with the receive time and append it. Returns the new length.
    pub fn push(&self, envelope: MessageEnvelope) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(QueuedEnvelope {
            envelope,
            received_at: Utc::now(),
        });
        entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the queue contents.
    pub fn snapshot(&self) -> Vec<QueuedEnvelope> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(id: &str) -> MessageEnvelope {
        MessageEnvelope {
            id: id.to_string(),
            source_agent_id: "peer".to_string(),
            target_agent_id: None,
            message_type: "ping".to_string(),
            payload: serde_json::Value::Null,
            timestamp: None,
        }
    }

    #[test]
    fn test_push_keeps_arrival_order() {
        let queue = InboundQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.push(envelope("a")), 1);
        assert_eq!(queue.push(envelope("b")), 2);

        let ids: Vec<String> = queue
            .snapshot()
            .into_iter()
            .map(|q| q.envelope.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_ids_are_kept() {
        let queue = InboundQueue::new();
        queue.push(envelope("same"));
        queue.push(envelope("same"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_received_at_is_monotonic() {
        let queue = InboundQueue::new();
        queue.push(envelope("a"));
        queue.push(envelope("b"));
        let snapshot = queue.snapshot();
        assert!(snapshot[0].received_at <= snapshot[1].received_at);
    }
}
