//! PeerLink CLI: boots an agent and serves its HTTP API.

mod cli;
mod config;

use crate::cli::{Cli, Commands};
use anyhow::Context;
use clap::Parser;
use peerlink_types::{AgentConfig, AgentIdentity, LogFormat};
use peerlink_wire::Agent;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

fn init_tracing(level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = config::load_config(cli.config.as_deref())?;
    let mut config = loaded.config;
    let mut events = loaded.events;
    events.extend(config::apply_env_overrides(&mut config));
    if cli.json {
        config.log_format = LogFormat::Json;
    }

    if let Commands::Start {
        port,
        host,
        agent_id,
        agent_name,
    } = &cli.command
    {
        if let Some(port) = port {
            config.port = *port;
        }
        if let Some(host) = host {
            config.host = host.clone();
        }
        if agent_id.is_some() {
            config.agent_id = agent_id.clone();
        }
        if let Some(name) = agent_name {
            config.agent_name = name.clone();
        }
    }

    init_tracing(&config.log_level, config.log_format);
    for event in &events {
        event.log();
    }

    match cli.command {
        Commands::Config => {
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            print!("{rendered}");
            Ok(())
        }
        Commands::Start { .. } => {
            let rt = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
            rt.block_on(cmd_start(config))
        }
    }
}

async fn cmd_start(config: AgentConfig) -> anyhow::Result<()> {
    let agent = Arc::new(
        Agent::builder()
            .identity(AgentIdentity::new(
                config.agent_id.clone(),
                Some(config.agent_name.clone()),
            ))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build(),
    );

    let listen_addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind {listen_addr}"))?;

    info!(
        agent_id = %agent.id(),
        agent_name = %agent.name(),
        port = config.port,
        "Starting PeerLink agent"
    );

    peerlink_api::run_server(listener, agent, config.cors_permissive, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl+C, shutting down");
    })
    .await
    .context("Server error")?;

    Ok(())
}
