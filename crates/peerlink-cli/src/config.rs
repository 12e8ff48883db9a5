//! Configuration loading from `~/.peerlink/config.toml` with defaults,
//! followed by `PEERLINK_*` environment overrides.
//!
//! The log level itself comes from the config, so loading runs before the
//! subscriber exists. Diagnostics are collected as [`ConfigEvent`]s and
//! logged by the caller once tracing is initialized.

use peerlink_types::AgentConfig;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Something worth logging that happened while building the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEvent {
    Loaded { path: PathBuf },
    DefaultMissing { path: PathBuf },
    Unreadable { path: PathBuf, error: String },
    Invalid { path: PathBuf, error: String },
    BadOverride { key: &'static str, value: String, error: String },
}

impl ConfigEvent {
    /// Emit through the installed tracing subscriber.
    pub fn log(&self) {
        match self {
            Self::Loaded { path } | Self::DefaultMissing { path } => {
                info!(path = %path.display(), "{self}")
            }
            Self::Unreadable { path, error } | Self::Invalid { path, error } => {
                warn!(path = %path.display(), error = %error, "{self}")
            }
            Self::BadOverride { value, error, .. } => {
                warn!(value = %value, error = %error, "{self}")
            }
        }
    }
}

impl fmt::Display for ConfigEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { .. } => write!(f, "Loaded configuration"),
            Self::DefaultMissing { .. } => write!(f, "Config file not found, using defaults"),
            Self::Unreadable { .. } => write!(f, "Failed to read config file, using defaults"),
            Self::Invalid { .. } => write!(f, "Failed to parse config, using defaults"),
            Self::BadOverride { key, .. } => write!(f, "Ignoring invalid {key}"),
        }
    }
}

/// A configuration plus the events produced while loading it.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AgentConfig,
    pub events: Vec<ConfigEvent>,
}

/// Default config location.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".peerlink")
        .join("config.toml")
}

/// Load configuration from `path`, or from the default location.
///
/// A missing default file means defaults. A file that exists but cannot be
/// read or parsed is reported as a warning event and replaced by defaults.
/// Only an explicitly requested file that does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let config_path = match path {
        Some(p) if !p.exists() => return Err(ConfigError::NotFound(p.to_path_buf())),
        Some(p) => p.to_path_buf(),
        None => default_config_path(),
    };

    let defaults = |event| LoadedConfig {
        config: AgentConfig::default(),
        events: vec![event],
    };

    if !config_path.exists() {
        return Ok(defaults(ConfigEvent::DefaultMissing { path: config_path }));
    }

    let contents = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            return Ok(defaults(ConfigEvent::Unreadable {
                path: config_path,
                error: e.to_string(),
            }))
        }
    };

    match toml::from_str::<AgentConfig>(&contents) {
        Ok(config) => Ok(LoadedConfig {
            config,
            events: vec![ConfigEvent::Loaded { path: config_path }],
        }),
        Err(e) => Ok(defaults(ConfigEvent::Invalid {
            path: config_path,
            error: e.to_string(),
        })),
    }
}

/// Apply `PEERLINK_*` overrides from the process environment.
pub fn apply_env_overrides(config: &mut AgentConfig) -> Vec<ConfigEvent> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

fn apply_overrides(
    config: &mut AgentConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Vec<ConfigEvent> {
    let mut events = Vec::new();

    if let Some(id) = lookup("PEERLINK_AGENT_ID") {
        config.agent_id = Some(id);
    }
    if let Some(name) = lookup("PEERLINK_AGENT_NAME") {
        config.agent_name = name;
    }
    if let Some(host) = lookup("PEERLINK_HOST") {
        config.host = host;
    }
    if let Some(level) = lookup("PEERLINK_LOG_LEVEL") {
        config.log_level = level;
    }
    if let Some(port) = lookup("PEERLINK_PORT") {
        match port.parse() {
            Ok(p) => config.port = p,
            Err(e) => events.push(ConfigEvent::BadOverride {
                key: "PEERLINK_PORT",
                value: port,
                error: e.to_string(),
            }),
        }
    }
    if let Some(timeout) = lookup("PEERLINK_REQUEST_TIMEOUT") {
        match timeout.parse() {
            Ok(t) => config.request_timeout_secs = t,
            Err(e) => events.push(ConfigEvent::BadOverride {
                key: "PEERLINK_REQUEST_TIMEOUT",
                value: timeout,
                error: e.to_string(),
            }),
        }
    }

    events
}
