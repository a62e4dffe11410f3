//! Node configuration with TOML file support.

use std::path::Path;

use serde::{Deserialize, Serialize};

use quorum_consensus::service::{DEFAULT_INPUT_CAPACITY, DEFAULT_OUTPUT_CAPACITY};
use quorum_consensus::ConsistencyModel;
use quorum_synchronizer::service::DEFAULT_EVENT_CAPACITY;
use quorum_synchronizer::SyncConfig;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for the commit pipeline of one node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Fault model used to check block signatures during synchronization.
    #[serde(default)]
    pub consistency_model: ConsistencyModel,

    /// Capacity of the gate's proposal and outcome queues.
    #[serde(default = "default_gate_input_capacity")]
    pub gate_input_capacity: usize,

    /// Capacity of the gate-to-synchronizer decision queue and of the
    /// decision broadcast.
    #[serde(default = "default_decision_capacity")]
    pub decision_capacity: usize,

    /// Capacity of the synchronization event broadcast.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Block download policy. Kept last: TOML tables follow plain keys.
    #[serde(default)]
    pub sync: SyncConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_gate_input_capacity() -> usize {
    DEFAULT_INPUT_CAPACITY
}

fn default_decision_capacity() -> usize {
    DEFAULT_OUTPUT_CAPACITY
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject values the channels and the download loop cannot work with.
    pub fn validate(&self) -> Result<(), NodeError> {
        let capacities = [
            ("gate_input_capacity", self.gate_input_capacity),
            ("decision_capacity", self.decision_capacity),
            ("event_capacity", self.event_capacity),
            ("sync.max_requests_per_peer", self.sync.max_requests_per_peer),
        ];
        match capacities.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(NodeError::Config(format!("{name} must be greater than zero"))),
            None => Ok(()),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            consistency_model: ConsistencyModel::default(),
            gate_input_capacity: default_gate_input_capacity(),
            decision_capacity: default_decision_capacity(),
            event_capacity: default_event_capacity(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            sync: SyncConfig::default(),
        }
    }
}
