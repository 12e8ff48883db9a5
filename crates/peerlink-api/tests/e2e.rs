//! Two agents talking over real HTTP on localhost.

use peerlink_api::run_server;
use peerlink_types::{AgentIdentity, AgentLiveness};
use peerlink_wire::Agent;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct RunningAgent {
    agent: Arc<Agent>,
    url: String,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<std::io::Result<()>>,
}

async fn spawn_agent(id: &str, name: &str) -> RunningAgent {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let agent = Arc::new(
        Agent::builder()
            .identity(AgentIdentity::new(Some(id.into()), Some(name.into())))
            .timeout(Duration::from_secs(5))
            .build(),
    );

    let (tx, rx) = oneshot::channel::<()>();
    let server = tokio::spawn(run_server(listener, agent.clone(), true, async move {
        let _ = rx.await;
    }));

    RunningAgent {
        agent,
        url: format!("http://{addr}"),
        shutdown: tx,
        server,
    }
}

#[tokio::test]
async fn test_connect_ping_and_data_request() {
    let alpha = spawn_agent("alpha", "Alpha").await;
    let bravo = spawn_agent("bravo", "Bravo").await;

    assert!(alpha.agent.connect(&bravo.url, "bravo").await);
    assert_eq!(alpha.agent.connections()[0].peer_id, "bravo");
    // Handshakes are not queued and do not register the initiator.
    assert_eq!(bravo.agent.status().message_queue_count, 0);
    assert!(bravo.agent.connections().is_empty());

    let pong = alpha.agent.ping("bravo").await.unwrap();
    assert_eq!(pong["status"], "pong");
    assert_eq!(pong["agent_id"], "bravo");

    let data = alpha
        .agent
        .send_message("bravo", "data_request", json!({"data_type": "order_data"}))
        .await
        .unwrap();
    assert_eq!(data["status"], "data_response");
    assert_eq!(data["data"][1]["order_id"], "ORD002");

    let received = bravo.agent.inbound_messages();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].envelope.message_type, "ping");
    assert_eq!(received[1].envelope.source_agent_id, "alpha");
    assert_eq!(received[1].envelope.id, data["message_id"]);
}

#[tokio::test]
async fn test_operator_endpoints_over_http() {
    let alpha = spawn_agent("alpha", "Alpha").await;
    let bravo = spawn_agent("bravo", "Bravo").await;
    let client = reqwest::Client::new();

    let connected: Value = client
        .post(format!("{}/api/agent/connect", alpha.url))
        .json(&json!({"target_agent_url": bravo.url, "target_agent_id": "bravo"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(connected["status"], "connection_established");
    assert_eq!(connected["target_agent_id"], "bravo");

    let sent = client
        .post(format!("{}/api/agent/send", alpha.url))
        .json(&json!({
            "target_agent_id": "bravo",
            "message_type": "data_request",
            "payload": {"data_type": "user_data"}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(sent.status(), 200);
    let sent: Value = sent.json().await.unwrap();
    assert_eq!(sent["status"], "message_sent");
    assert_eq!(sent["response"]["data"][0]["id"], 1);

    let pinged: Value = client
        .post(format!("{}/api/agent/ping/bravo", alpha.url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(pinged["status"], "ping_sent");
    assert_eq!(pinged["response"]["status"], "pong");

    let status: Value = client
        .get(format!("{}/api/agent/status", bravo.url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["agent_id"], "bravo");
    assert_eq!(status["message_queue_count"], 2);

    let connections: Value = client
        .get(format!("{}/api/agent/connections", alpha.url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(connections["count"], 1);
    assert_eq!(connections["connections"][0]["peer_url"], bravo.url);
    assert_eq!(connections["connections"][0]["status"], "connected");
}

#[tokio::test]
async fn test_reconnect_replaces_url() {
    let alpha = spawn_agent("alpha", "Alpha").await;
    let bravo = spawn_agent("bravo", "Bravo").await;
    let charlie = spawn_agent("charlie", "Charlie").await;

    // Same peer ID, two different servers: the later handshake wins.
    assert!(alpha.agent.connect(&bravo.url, "peer").await);
    assert!(alpha.agent.connect(&charlie.url, "peer").await);

    let pong = alpha.agent.ping("peer").await.unwrap();
    assert_eq!(pong["agent_id"], "charlie");
    assert_eq!(bravo.agent.status().message_queue_count, 0);
}

#[tokio::test]
async fn test_send_to_stopped_peer_fails_and_keeps_connection() {
    let alpha = spawn_agent("alpha", "Alpha").await;
    let bravo = spawn_agent("bravo", "Bravo").await;
    assert!(alpha.agent.connect(&bravo.url, "bravo").await);

    bravo.shutdown.send(()).unwrap();
    bravo.server.await.unwrap().unwrap();
    assert_eq!(bravo.agent.liveness(), AgentLiveness::Stopped);

    let err = alpha.agent.ping("bravo").await.unwrap_err();
    assert!(err.to_string().contains("bravo"));
    assert_eq!(alpha.agent.connections().len(), 1);
}
