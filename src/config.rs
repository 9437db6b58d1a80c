//! Replog Configuration
//!
//! Configuration structures for a replicated log node. A node with a
//! non-empty secondary list is the primary; a node with none is a
//! secondary.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main replog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplogConfig {
    /// Node-specific configuration
    pub node: NodeConfig,

    /// Replication configuration
    #[serde(default)]
    pub replication: ReplicationSettings,

    /// Chaos testing configuration
    #[serde(default)]
    pub chaos: ChaosConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Node role, derived from the secondary list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    /// Assigns ids and originates quorum waits
    Primary,
    /// Adopts ids from the wire, never fans out
    Secondary,
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRole::Primary => write!(f, "primary"),
            NodeRole::Secondary => write!(f, "secondary"),
        }
    }
}

/// Node-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Address to bind the HTTP listener
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Secondary endpoints to replicate to.
    /// Empty list means this node runs in secondary mode.
    #[serde(default)]
    pub secondaries: Vec<String>,
}

/// Replication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationSettings {
    /// Per-attempt request timeout in milliseconds.
    /// A timed-out attempt counts as rejected; the write itself is unaffected.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Quorum wait timeout in milliseconds (0 = wait forever)
    #[serde(default)]
    pub quorum_timeout_ms: u64,

    /// Progress log cadence while waiting for quorum, in milliseconds
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,
}

/// Chaos testing configuration.
///
/// When enabled on a secondary, every append is delayed by a random
/// duration so quorum waits and the pending backlog can be observed
/// under slow-replica conditions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChaosConfig {
    /// Enable artificial append delay
    #[serde(default)]
    pub enabled: bool,

    /// Minimum delay in milliseconds
    #[serde(default = "default_chaos_min_ms")]
    pub delay_min_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_chaos_max_ms")]
    pub delay_max_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_listen_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_progress_interval_ms() -> u64 {
    500
}

fn default_chaos_min_ms() -> u64 {
    5_000
}

fn default_chaos_max_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ReplicationSettings {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            quorum_timeout_ms: 0,
            progress_interval_ms: default_progress_interval_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ReplogConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig {
                listen_address: default_listen_address(),
                secondaries: Vec::new(),
            },
            replication: ReplicationSettings::default(),
            chaos: ChaosConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ReplogConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ReplogConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> crate::Result<Self> {
        let config: ReplogConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.node.listen_address.is_empty() {
            return Err(crate::Error::Config(
                "node.listen_address cannot be empty".into(),
            ));
        }

        if self.node.secondaries.iter().any(|s| s.is_empty()) {
            return Err(crate::Error::Config(
                "node.secondaries cannot contain empty endpoints".into(),
            ));
        }

        if self.chaos.enabled && self.chaos.delay_min_ms > self.chaos.delay_max_ms {
            return Err(crate::Error::Config(
                "chaos.delay_min_ms cannot exceed chaos.delay_max_ms".into(),
            ));
        }

        Ok(())
    }

    /// Node role derived from the secondary list
    pub fn role(&self) -> NodeRole {
        if self.node.secondaries.is_empty() {
            NodeRole::Secondary
        } else {
            NodeRole::Primary
        }
    }

    /// Total node count: this node plus its secondaries
    pub fn total_nodes(&self) -> usize {
        self.node.secondaries.len() + 1
    }

    /// Per-attempt request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.replication.request_timeout_ms)
    }

    /// Quorum wait timeout, None = wait forever
    pub fn quorum_timeout(&self) -> Option<Duration> {
        match self.replication.quorum_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Quorum progress log cadence as Duration
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.replication.progress_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[node]
listen_address = "0.0.0.0:8000"
secondaries = ["http://localhost:8001", "http://localhost:8002"]

[replication]
request_timeout_ms = 5000
progress_interval_ms = 250
"#;

        let config = ReplogConfig::from_str(toml).unwrap();
        assert_eq!(config.node.secondaries.len(), 2);
        assert_eq!(config.role(), NodeRole::Primary);
        assert_eq!(config.total_nodes(), 3);
        assert_eq!(config.quorum_timeout(), None);
        assert_eq!(config.request_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_secondary_role_when_no_secondaries() {
        let toml = r#"
[node]
listen_address = "0.0.0.0:8001"
"#;

        let config = ReplogConfig::from_str(toml).unwrap();
        assert_eq!(config.role(), NodeRole::Secondary);
        assert_eq!(config.total_nodes(), 1);
    }

    #[test]
    fn test_quorum_timeout_configured() {
        let toml = r#"
[node]
listen_address = "0.0.0.0:8000"
secondaries = ["http://localhost:8001"]

[replication]
quorum_timeout_ms = 2000
"#;

        let config = ReplogConfig::from_str(toml).unwrap();
        assert_eq!(config.quorum_timeout(), Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replog.toml");
        std::fs::write(
            &path,
            "[node]\nlisten_address = \"0.0.0.0:9000\"\nsecondaries = [\"http://localhost:9001\"]\n",
        )
        .unwrap();

        let config = ReplogConfig::from_file(&path).unwrap();
        assert_eq!(config.node.listen_address, "0.0.0.0:9000");
        assert_eq!(config.role(), NodeRole::Primary);
    }

    #[test]
    fn test_invalid_chaos_range_rejected() {
        let toml = r#"
[node]
listen_address = "0.0.0.0:8001"

[chaos]
enabled = true
delay_min_ms = 100
delay_max_ms = 50
"#;

        assert!(ReplogConfig::from_str(toml).is_err());
    }
}
