//! Clap CLI definitions for PeerLink.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PeerLink: a minimal agent-to-agent messaging node.
#[derive(Parser)]
#[command(name = "peerlink", version, about)]
pub struct Cli {
    /// Path to config file (default: ~/.peerlink/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the agent and its HTTP API.
    Start {
        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,
        /// Interface to bind.
        #[arg(long)]
        host: Option<String>,
        /// Agent ID (generated when not set anywhere).
        #[arg(long)]
        agent_id: Option<String>,
        /// Human-readable agent name.
        #[arg(long)]
        agent_name: Option<String>,
    },
    /// Print the effective configuration as TOML.
    Config,
}
