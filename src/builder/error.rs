//! Build errors for the machine builder.

use crate::engine::{ConfigError, TransitionError};
use crate::registry::RegistryError;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Host not specified. Call .host(host) before .build()")]
    MissingHost,

    #[error("No states registered. Call .state(id) or .states(ids) before .build()")]
    NoStates,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("State registration failed: {0}")]
    Registry(#[from] RegistryError),

    #[error("Initial transition rejected: {0}")]
    Initial(#[from] TransitionError),
}
