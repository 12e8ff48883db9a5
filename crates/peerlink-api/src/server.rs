//! Router assembly and the server loop.

use crate::routes::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use peerlink_wire::AGENT_API_PREFIX;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the full router: agent endpoints under `/api/agent`, plus `/` and `/health`.
pub fn build_router(agent: AppState, cors_permissive: bool) -> Router {
    let agent_routes = Router::new()
        .route("/handshake", post(routes::handshake))
        .route("/message", post(routes::receive_message))
        .route("/connect", post(routes::connect))
        .route("/send", post(routes::send))
        .route("/status", get(routes::status))
        .route("/ping/{target_agent_id}", post(routes::ping))
        .route("/connections", get(routes::connections))
        .route("/messages", get(routes::messages));

    let cors = if cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .nest(AGENT_API_PREFIX, agent_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(agent)
}

/// Serve `agent` on `listener` until `shutdown` resolves.
///
/// The agent is marked stopped once the server has drained.
pub async fn run_server<F>(
    listener: TcpListener,
    agent: AppState,
    cors_permissive: bool,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    let app = build_router(agent.clone(), cors_permissive);

    info!(
        agent_id = %agent.id(),
        agent_name = %agent.name(),
        "PeerLink agent listening on http://{addr}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    agent.shutdown();
    info!("PeerLink agent server stopped");
    Ok(())
}
