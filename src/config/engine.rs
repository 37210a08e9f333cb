//! Lifecycle engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound accepted for the persistence timeout.
const MAX_PERSISTENCE_TIMEOUT_MS: u64 = 60_000;

/// Lifecycle engine configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Default bound on each repository call, in milliseconds
    #[serde(default = "default_persistence_timeout_ms")]
    pub persistence_timeout_ms: u64,

    /// Whether committed transitions are published as events
    #[serde(default = "default_publish_events")]
    pub publish_events: bool,
}

impl EngineConfig {
    /// Default persistence timeout as a `Duration`.
    pub fn persistence_timeout(&self) -> Duration {
        Duration::from_millis(self.persistence_timeout_ms)
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.persistence_timeout_ms == 0 || self.persistence_timeout_ms > MAX_PERSISTENCE_TIMEOUT_MS {
            return Err(ValidationError::InvalidPersistenceTimeout(
                self.persistence_timeout_ms,
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            persistence_timeout_ms: default_persistence_timeout_ms(),
            publish_events: default_publish_events(),
        }
    }
}

fn default_persistence_timeout_ms() -> u64 {
    5_000
}

fn default_publish_events() -> bool {
    true
}
