//! Dispatcher: routes inbound envelopes to handlers by message type.
//!
//! Handlers are looked up in a table keyed by `message_type`. Types with no
//! registered handler go to a fallback that acknowledges receipt; an unknown
//! type is never an error.
//!
//! The [`MessageHandler`] trait is the extension point. Plain closures can be
//! registered with [`Dispatcher::register_fn`].

use crate::provider::DataProvider;
use async_trait::async_trait;
use chrono::Utc;
use peerlink_types::message::{MSG_DATA_REQUEST, MSG_DATA_RESPONSE, MSG_PING};
use peerlink_types::{AgentIdentity, HandlerError, MessageEnvelope};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Placeholder message returned for unknown or missing `data_type`s.
pub const NO_DATA_MESSAGE: &str = "No data available for this type";

/// Handles one kind of inbound message and produces the reply payload.
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    /// Build the reply for `envelope`, received by the agent `agent`.
    ///
    /// Implementations must tolerate missing or mistyped payload fields.
    async fn handle(
        &self,
        agent: &AgentIdentity,
        envelope: &MessageEnvelope,
    ) -> Result<Value, HandlerError>;
}

/// Adapter that lets a synchronous closure act as a handler.
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F> MessageHandler for FnHandler<F>
where
    F: Fn(&AgentIdentity, &MessageEnvelope) -> Result<Value, HandlerError> + Send + Sync + 'static,
{
    async fn handle(
        &self,
        agent: &AgentIdentity,
        envelope: &MessageEnvelope,
    ) -> Result<Value, HandlerError> {
        (self.0)(agent, envelope)
    }
}

/// `ping` → pong carrying this agent's ID.
pub struct PingHandler;

#[async_trait]
impl MessageHandler for PingHandler {
    async fn handle(
        &self,
        agent: &AgentIdentity,
        envelope: &MessageEnvelope,
    ) -> Result<Value, HandlerError> {
        Ok(json!({
            "status": "pong",
            "message_id": envelope.id,
            "agent_id": agent.id,
            "timestamp": Utc::now(),
        }))
    }
}

/// `data_request` → the dataset named by `payload.data_type`.
pub struct DataRequestHandler {
    provider: Arc<dyn DataProvider>,
}

impl DataRequestHandler {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl MessageHandler for DataRequestHandler {
    async fn handle(
        &self,
        _agent: &AgentIdentity,
        envelope: &MessageEnvelope,
    ) -> Result<Value, HandlerError> {
        let data_type = envelope
            .payload_str("data_type")
            .or_else(|| envelope.payload_str("dataType"));

        let data = match data_type {
            Some(data_type) => self.provider.fetch(data_type).await,
            None => None,
        };
        let data = data.unwrap_or_else(|| {
            debug!(data_type = ?data_type, "No data for requested type");
            json!({ "message": NO_DATA_MESSAGE })
        });

        Ok(json!({
            "status": "data_response",
            "message_id": envelope.id,
            "data": data,
            "timestamp": Utc::now(),
        }))
    }
}

/// `data_response` → terminal acknowledgement; the payload is only logged.
pub struct DataResponseHandler;

#[async_trait]
impl MessageHandler for DataResponseHandler {
    async fn handle(
        &self,
        _agent: &AgentIdentity,
        envelope: &MessageEnvelope,
    ) -> Result<Value, HandlerError> {
        info!(
            message_id = %envelope.id,
            from = %envelope.source_agent_id,
            payload = %envelope.payload,
            "Received data response"
        );
        Ok(json!({
            "status": "acknowledged",
            "message_id": envelope.id,
            "timestamp": Utc::now(),
        }))
    }
}

/// Fallback for unregistered types: acknowledge receipt.
pub struct ReceivedHandler;

#[async_trait]
impl MessageHandler for ReceivedHandler {
    async fn handle(
        &self,
        _agent: &AgentIdentity,
        envelope: &MessageEnvelope,
    ) -> Result<Value, HandlerError> {
        Ok(json!({
            "status": "received",
            "message_id": envelope.id,
            "timestamp": Utc::now(),
        }))
    }
}

/// Handler table keyed by message type, with a fallback.
pub struct Dispatcher {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
    fallback: Arc<dyn MessageHandler>,
}

impl Dispatcher {
    /// An empty table; every message gets the "received" acknowledgement.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: Arc::new(ReceivedHandler),
        }
    }

    /// A table with the built-in `ping`, `data_request` and `data_response` handlers.
    pub fn with_builtin_handlers(provider: Arc<dyn DataProvider>) -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register(MSG_PING, PingHandler);
        dispatcher.register(MSG_DATA_REQUEST, DataRequestHandler::new(provider));
        dispatcher.register(MSG_DATA_RESPONSE, DataResponseHandler);
        dispatcher
    }

    /// Register `handler` for `message_type`, returning the handler it replaced.
    pub fn register(
        &mut self,
        message_type: impl Into<String>,
        handler: impl MessageHandler,
    ) -> Option<Arc<dyn MessageHandler>> {
        self.handlers.insert(message_type.into(), Arc::new(handler))
    }

    /// Register a closure for `message_type`.
    pub fn register_fn<F>(&mut self, message_type: impl Into<String>, f: F)
    where
        F: Fn(&AgentIdentity, &MessageEnvelope) -> Result<Value, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.register(message_type, FnHandler(f));
    }

    /// Replace the handler used for unregistered types.
    pub fn set_fallback(&mut self, handler: impl MessageHandler) {
        self.fallback = Arc::new(handler);
    }

    /// Registered message types, sorted.
    pub fn message_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }

    /// Route `envelope` to its handler and return the reply payload.
    pub async fn dispatch(
        &self,
        agent: &AgentIdentity,
        envelope: &MessageEnvelope,
    ) -> Result<Value, HandlerError> {
        let handler = self
            .handlers
            .get(&envelope.message_type)
            .unwrap_or(&self.fallback);
        handler.handle(agent, envelope).await
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
