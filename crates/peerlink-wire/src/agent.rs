//! The agent façade over identity, connections and the inbound queue.
//!
//! An [`Agent`] is what the HTTP layer talks to. Outbound, it handshakes with
//! peers ([`Agent::connect`]) and posts envelopes to connected peers
//! ([`Agent::send_message`]). Inbound, it queues every envelope a peer posts
//! and answers through the [`Dispatcher`] ([`Agent::receive_message`]).
//!
//! Each agent owns independent state; nothing is global.

use crate::dispatch::{Dispatcher, FnHandler, MessageHandler};
use crate::handshake::HandshakeCoordinator;
use crate::provider::{DataProvider, SampleDataProvider};
use crate::queue::InboundQueue;
use crate::registry::ConnectionRegistry;
use crate::transport::{endpoint_url, HttpTransport, Transport};
use chrono::Utc;
use peerlink_types::message::MSG_PING;
use peerlink_types::{
    AgentError, AgentIdentity, AgentLiveness, AgentResult, Connection, HandlerError,
    HandshakeAck, HandshakeRequest, MessageEnvelope, QueuedEnvelope, StatusSnapshot,
    TransportError,
};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// A PeerLink agent.
pub struct Agent {
    identity: AgentIdentity,
    registry: ConnectionRegistry,
    queue: InboundQueue,
    liveness: RwLock<AgentLiveness>,
    transport: Arc<dyn Transport>,
    handshake: HandshakeCoordinator,
    dispatcher: Dispatcher,
}

impl Agent {
    /// Start building an agent.
    pub fn builder() -> AgentBuilder {
        AgentBuilder::default()
    }

    /// An agent with the built-in handlers, sample data and an HTTP transport.
    pub fn new(identity: AgentIdentity) -> Self {
        Self::builder().identity(identity).build()
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Current liveness flag.
    pub fn liveness(&self) -> AgentLiveness {
        *self.liveness.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark the agent stopped. Connections and queue are left as they are.
    pub fn shutdown(&self) {
        *self.liveness.write().unwrap_or_else(|e| e.into_inner()) = AgentLiveness::Stopped;
        info!(agent_id = %self.identity.id, "Agent stopped");
    }

    /// Handshake with the agent at `peer_url` and remember it as `peer_id`.
    ///
    /// Returns `false` if the handshake failed; the failure is logged and the
    /// connection registry is left unchanged.
    pub async fn connect(&self, peer_url: &str, peer_id: &str) -> bool {
        self.handshake.connect(peer_url, peer_id).await
    }

    /// Answer a handshake initiated by a peer.
    pub fn accept_handshake(&self, request: &HandshakeRequest) -> HandshakeAck {
        self.handshake.acknowledge(request)
    }

    /// Send a message to a connected peer and return its reply body.
    ///
    /// Fails with [`AgentError::NotConnected`] before any network activity if
    /// no handshake with `target_peer_id` has succeeded. A transport failure
    /// is returned as [`AgentError::SendFailed`]; nothing is retried.
    pub async fn send_message(
        &self,
        target_peer_id: &str,
        message_type: &str,
        payload: Value,
    ) -> AgentResult<Value> {
        let connection = self
            .registry
            .get(target_peer_id)
            .ok_or_else(|| AgentError::NotConnected(target_peer_id.to_string()))?;

        let envelope =
            MessageEnvelope::outbound(&self.identity.id, target_peer_id, message_type, payload);
        let message_id = envelope.id.clone();

        let send_failed = |source: TransportError| AgentError::SendFailed {
            peer_id: target_peer_id.to_string(),
            source,
        };

        let url = endpoint_url(&connection.peer_url, "/message");
        let body = serde_json::to_value(&envelope)
            .map_err(|e| send_failed(TransportError::Json(e.to_string())))?;

        let response = self.transport.post(&url, body).await.map_err(|e| {
            warn!(peer_id = %target_peer_id, message_id = %message_id, error = %e, "Send failed");
            send_failed(e)
        })?;

        if !response.is_success() {
            warn!(
                peer_id = %target_peer_id,
                message_id = %message_id,
                status = response.status,
                "Peer rejected message"
            );
            return Err(send_failed(TransportError::Status {
                url,
                status: response.status,
            }));
        }

        let reply = response.json().map_err(send_failed)?;
        info!(
            peer_id = %target_peer_id,
            message_id = %message_id,
            message_type = %message_type,
            "Message sent"
        );
        Ok(reply)
    }

    /// Send a `ping` to a connected peer.
    pub async fn ping(&self, target_peer_id: &str) -> AgentResult<Value> {
        let payload = serde_json::json!({
            "message": "ping test",
            "timestamp": Utc::now(),
        });
        self.send_message(target_peer_id, MSG_PING, payload).await
    }

    /// Accept an envelope posted by a peer and produce the reply.
    ///
    /// The envelope is queued before dispatch, whatever its content.
    pub async fn receive_message(&self, envelope: MessageEnvelope) -> AgentResult<Value> {
        info!(
            from = %envelope.source_agent_id,
            message_id = %envelope.id,
            message_type = %envelope.message_type,
            "Received message"
        );
        let queued = self.queue.push(envelope.clone());
        debug!(queue_len = queued, "Inbound message queued");

        self.dispatcher
            .dispatch(&self.identity, &envelope)
            .await
            .map_err(|source| AgentError::Handler {
                message_id: envelope.id.clone(),
                source,
            })
    }

    /// Point-in-time view of this agent.
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            agent_id: self.identity.id.clone(),
            agent_name: self.identity.name.clone(),
            status: self.liveness(),
            connections: self.registry.all(),
            message_queue_count: self.queue.len(),
            timestamp: Utc::now(),
        }
    }

    /// Known connections, ordered by peer ID.
    pub fn connections(&self) -> Vec<Connection> {
        self.registry.all()
    }

    /// Every envelope received so far, in arrival order.
    pub fn inbound_messages(&self) -> Vec<QueuedEnvelope> {
        self.queue.snapshot()
    }

    /// Message types with a dedicated handler.
    pub fn message_types(&self) -> Vec<String> {
        self.dispatcher.message_types()
    }
}

/// Builder for [`Agent`].
#[derive(Default)]
pub struct AgentBuilder {
    identity: Option<AgentIdentity>,
    transport: Option<Arc<dyn Transport>>,
    timeout: Option<Duration>,
    provider: Option<Arc<dyn DataProvider>>,
    handlers: Vec<(String, Box<dyn FnOnce(&mut Dispatcher) + Send>)>,
}

impl AgentBuilder {
    /// Use this identity instead of a generated one.
    pub fn identity(mut self, identity: AgentIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Use a custom transport. Overrides [`AgentBuilder::timeout`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Timeout for the default HTTP transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Source of datasets for `data_request`.
    pub fn data_provider(mut self, provider: Arc<dyn DataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Register (or replace) the handler for `message_type`.
    pub fn handler(mut self, message_type: impl Into<String>, handler: impl MessageHandler) -> Self {
        let message_type = message_type.into();
        let key = message_type.clone();
        self.handlers.push((
            key,
            Box::new(move |dispatcher: &mut Dispatcher| {
                dispatcher.register(message_type, handler);
            }),
        ));
        self
    }

    /// Register (or replace) a closure handler for `message_type`.
    pub fn handler_fn<F>(self, message_type: impl Into<String>, f: F) -> Self
    where
        F: Fn(&AgentIdentity, &MessageEnvelope) -> Result<Value, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.handler(message_type, FnHandler(f))
    }

    pub fn build(self) -> Agent {
        let identity = self
            .identity
            .unwrap_or_else(|| AgentIdentity::new(None, None));
        let transport = self.transport.unwrap_or_else(|| {
            Arc::new(HttpTransport::new(
                self.timeout.unwrap_or(crate::transport::DEFAULT_TIMEOUT),
            ))
        });
        let provider = self
            .provider
            .unwrap_or_else(|| Arc::new(SampleDataProvider));

        let mut dispatcher = Dispatcher::with_builtin_handlers(provider);
        for (message_type, register) in self.handlers {
            debug!(message_type = %message_type, "Registering custom handler");
            register(&mut dispatcher);
        }

        let registry = ConnectionRegistry::new();
        let handshake =
            HandshakeCoordinator::new(identity.clone(), Arc::clone(&transport), registry.clone());

        info!(agent_id = %identity.id, agent_name = %identity.name, "Agent initialized");

        Agent {
            identity,
            registry,
            queue: InboundQueue::new(),
            liveness: RwLock::new(AgentLiveness::Active),
            transport,
            handshake,
            dispatcher,
        }
    }
}
