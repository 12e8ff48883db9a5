//! Agent configuration, loaded from `~/.peerlink/config.toml` with defaults.

use serde::{Deserialize, Serialize};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines on stderr.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Top-level agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Agent ID. A UUID is generated at boot when unset.
    pub agent_id: Option<String>,
    /// Human-readable agent name.
    pub agent_name: String,
    /// Interface the HTTP API binds to.
    pub host: String,
    /// Port the HTTP API binds to.
    pub port: u16,
    /// Timeout for outbound calls to peers, in seconds.
    pub request_timeout_secs: u64,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub log_format: LogFormat,
    /// Allow cross-origin requests from any origin.
    pub cors_permissive: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_id: None,
            agent_name: crate::agent::DEFAULT_AGENT_NAME.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            cors_permissive: true,
        }
    }
}

impl AgentConfig {
    /// `host:port` string suitable for binding a listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert!(config.agent_id.is_none());
        assert_eq!(config.port, 8000);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.listen_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AgentConfig = toml::from_str(
            r#"
            agent_id = "agent-rs-001"
            port = 9100
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.agent_id.as_deref(), Some("agent-rs-001"));
        assert_eq!(config.port, 9100);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.agent_name, "PeerLink_Agent");
        assert!(config.cors_permissive);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AgentConfig {
            agent_id: Some("a-1".into()),
            agent_name: "alpha".into(),
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        let back: AgentConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
