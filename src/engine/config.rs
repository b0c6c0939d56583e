//! Machine configuration.

use crate::core::{StateId, TransitionHistory};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of transition records kept when nothing else is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 32;

/// Tunables for a `StateMachine`.
///
/// Deserializes with defaults for missing fields, so hosts can embed it in
/// their own configuration files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Maximum number of retained transition records; `None` keeps all
    pub history_limit: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

/// Configuration values that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("history_limit must be at least 1; use None to keep every record")]
    ZeroHistoryLimit,
}

impl MachineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == Some(0) {
            return Err(ConfigError::ZeroHistoryLimit);
        }
        Ok(())
    }

    /// An empty history honoring `history_limit`.
    pub(crate) fn new_history<I: StateId>(&self) -> TransitionHistory<I> {
        match self.history_limit {
            Some(limit) => TransitionHistory::with_limit(limit),
            None => TransitionHistory::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limit_is_bounded() {
        let config = MachineConfig::default();

        assert_eq!(config.history_limit, Some(DEFAULT_HISTORY_LIMIT));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let config = MachineConfig {
            history_limit: Some(0),
        };

        assert_eq!(config.validate(), Err(ConfigError::ZeroHistoryLimit));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: MachineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MachineConfig::default());

        let unbounded: MachineConfig = serde_json::from_str(r#"{"history_limit":null}"#).unwrap();
        assert_eq!(unbounded.history_limit, None);
        assert!(unbounded.validate().is_ok());
    }
}
