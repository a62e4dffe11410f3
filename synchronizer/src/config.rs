//! Synchronizer tuning.

use serde::{Deserialize, Serialize};

/// Download policy for catching up with the agreed chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// How many times one peer is asked again while it keeps delivering
    /// valid blocks short of the target height.
    #[serde(default = "default_max_requests_per_peer")]
    pub max_requests_per_peer: usize,
}

fn default_max_requests_per_peer() -> usize {
    16
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_requests_per_peer: default_max_requests_per_peer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: SyncConfig = toml::from_str("").unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.max_requests_per_peer, 16);
    }

    #[test]
    fn explicit_value_is_kept() {
        let config: SyncConfig = toml::from_str("max_requests_per_peer = 3").unwrap();
        assert_eq!(config.max_requests_per_peer, 3);
    }
}
