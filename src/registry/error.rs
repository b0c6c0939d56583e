//! Registry errors.

use thiserror::Error;

/// Errors raised while building or querying a state registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("No states registered. Provide at least one state id")]
    EmptyRegistration,

    #[error("State '{state}' is registered more than once")]
    DuplicateState { state: String },

    #[error("Machine is already initialized; the registry cannot be rebuilt")]
    AlreadyInitialized,

    #[error("State '{state}' is not registered")]
    NotFound { state: String },
}
