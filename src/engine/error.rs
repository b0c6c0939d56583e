//! Transition request errors.

use crate::core::TransitionPhase;
use thiserror::Error;

/// Reasons a `change_state` request was not accepted.
///
/// None of these are fatal: the engine is left exactly as it was and the
/// host may re-issue the request on a later tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Machine is not initialized. Call initialize() before change_state()")]
    NotInitialized,

    #[error("State '{state}' is not registered")]
    UnknownState { state: String },

    #[error("Transition to '{requested}' rejected: '{pending}' is still {phase}")]
    TransitionInFlight {
        requested: String,
        pending: String,
        phase: TransitionPhase,
    },
}

impl TransitionError {
    /// Whether the request was valid but arrived while another transition
    /// was running.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::TransitionInFlight { .. })
    }
}
