//! Diagnostic snapshots of a running machine.
//!
//! A snapshot records what the machine looked like at one point in time:
//! its phase, the committed and pending ids, the tick count and the recent
//! transition history. Handlers and running sequences are not captured, so
//! a snapshot is meant for logging, debugging and test assertions. It
//! cannot be used to rebuild a machine.

use crate::core::{StateId, TransitionHistory, TransitionPhase};
use crate::engine::{HostAdapter, StateMachine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable view of a machine's observable state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MachineSnapshot<I: StateId> {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    pub phase: TransitionPhase,

    /// Committed state
    pub active: Option<I>,

    /// Target of the transition in flight
    pub pending: Option<I>,

    /// Number of `advance` calls so far
    pub tick: u64,

    /// Registered states, in registration order
    pub states: Vec<I>,

    pub history: TransitionHistory<I>,
}

impl<I: StateId> MachineSnapshot<I> {
    /// Capture the current state of `machine`.
    pub fn capture<H: HostAdapter<I>>(machine: &StateMachine<I, H>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            phase: machine.phase(),
            active: machine.active_id(),
            pending: machine.pending_id(),
            tick: machine.tick(),
            states: machine.states().to_vec(),
            history: machine.history().clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the version and that the phase agrees with the recorded ids.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let consistent = match self.phase {
            TransitionPhase::Idle => self.active.is_none() && self.pending.is_none(),
            TransitionPhase::Active => self.active.is_some() && self.pending.is_none(),
            TransitionPhase::Exiting => self.active.is_some() && self.pending.is_some(),
            TransitionPhase::Entering => self.pending.is_some(),
        };
        if !consistent {
            return Err(SnapshotError::ValidationFailed(format!(
                "phase {} does not match active {:?} and pending {:?}",
                self.phase, self.active, self.pending
            )));
        }

        let unregistered = self
            .active
            .iter()
            .chain(self.pending.iter())
            .find(|id| !self.states.contains(*id));
        if let Some(id) = unregistered {
            return Err(SnapshotError::ValidationFailed(format!(
                "state '{}' is not registered",
                id.name()
            )));
        }

        Ok(())
    }
}
