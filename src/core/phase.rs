//! Transition phases and the role labels that go with them.
//!
//! `PhaseTracker` is the pure bookkeeping half of the engine: it knows which
//! phase holds, which state is committed and which one is pending, and it
//! only allows the moves of the phase graph
//!
//! ```text
//! Idle -> Entering -> Active -> (Exiting -> Entering -> Active)*
//! ```
//!
//! Running sequences and notifying the host is left to the engine.

use super::id::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the engine is currently doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionPhase {
    /// No state has ever been activated
    #[default]
    Idle,

    /// Running the exit sequence of the committed state
    Exiting,

    /// Running the enter sequence of the pending state
    Entering,

    /// A committed state exists and no transition is in flight
    Active,
}

impl TransitionPhase {
    /// Whether a transition is in flight.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Exiting | Self::Entering)
    }
}

impl fmt::Display for TransitionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "Idle",
            Self::Exiting => "Exiting",
            Self::Entering => "Entering",
            Self::Active => "Active",
        };
        f.write_str(s)
    }
}

/// Result of promoting the pending state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Commit<I> {
    /// Previously committed state, `None` for the first transition
    pub from: Option<I>,
    /// Newly committed state
    pub to: I,
}

/// Phase plus the current and pending role labels.
///
/// Invariants:
/// - `current` is `None` exactly while the phase is `Idle`, or `Entering`
///   for the very first transition
/// - `pending` is `Some` exactly while a transition is in flight
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PhaseTracker<I: StateId> {
    phase: TransitionPhase,
    current: Option<I>,
    pending: Option<I>,
}

impl<I: StateId> Default for PhaseTracker<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: StateId> PhaseTracker<I> {
    pub fn new() -> Self {
        Self {
            phase: TransitionPhase::Idle,
            current: None,
            pending: None,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// The committed state, if any.
    pub fn current(&self) -> Option<I> {
        self.current
    }

    /// The state a transition in flight is heading to.
    pub fn pending(&self) -> Option<I> {
        self.pending
    }

    /// True iff a committed state exists and nothing is in flight.
    pub fn is_ready(&self) -> bool {
        self.phase == TransitionPhase::Active
    }

    /// Start a transition towards `target`.
    ///
    /// Returns the phase the transition starts in: `Entering` from `Idle`,
    /// `Exiting` from `Active`. Returns `None` and changes nothing while a
    /// transition is already in flight.
    pub fn begin(&mut self, target: I) -> Option<TransitionPhase> {
        let next = match self.phase {
            TransitionPhase::Idle => TransitionPhase::Entering,
            TransitionPhase::Active => TransitionPhase::Exiting,
            TransitionPhase::Exiting | TransitionPhase::Entering => return None,
        };
        self.phase = next;
        self.pending = Some(target);
        Some(next)
    }

    /// Move from `Exiting` to `Entering` once the exit sequence is done.
    /// Returns false outside of `Exiting`.
    pub fn finish_exit(&mut self) -> bool {
        if self.phase != TransitionPhase::Exiting {
            return false;
        }
        self.phase = TransitionPhase::Entering;
        true
    }

    /// Promote the pending state to current and return to `Active`.
    /// Returns `None` outside of `Entering`.
    pub fn commit(&mut self) -> Option<Commit<I>> {
        if self.phase != TransitionPhase::Entering {
            return None;
        }
        let to = self.pending.take()?;
        let from = self.current.replace(to);
        self.phase = TransitionPhase::Active;
        Some(Commit { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestId {
        A,
        B,
    }

    impl StateId for TestId {
        fn name(&self) -> &str {
            match self {
                Self::A => "A",
                Self::B => "B",
            }
        }
    }

    #[test]
    fn new_tracker_is_idle() {
        let tracker: PhaseTracker<TestId> = PhaseTracker::new();

        assert_eq!(tracker.phase(), TransitionPhase::Idle);
        assert_eq!(tracker.current(), None);
        assert_eq!(tracker.pending(), None);
        assert!(!tracker.is_ready());
    }

    #[test]
    fn first_transition_skips_exit() {
        let mut tracker = PhaseTracker::new();

        assert_eq!(tracker.begin(TestId::A), Some(TransitionPhase::Entering));
        assert_eq!(tracker.pending(), Some(TestId::A));
        assert!(!tracker.finish_exit());

        let commit = tracker.commit().unwrap();
        assert_eq!(commit, Commit { from: None, to: TestId::A });
        assert!(tracker.is_ready());
        assert_eq!(tracker.current(), Some(TestId::A));
        assert_eq!(tracker.pending(), None);
    }

    #[test]
    fn later_transitions_exit_first() {
        let mut tracker = PhaseTracker::new();
        tracker.begin(TestId::A);
        tracker.commit();

        assert_eq!(tracker.begin(TestId::B), Some(TransitionPhase::Exiting));
        assert_eq!(tracker.current(), Some(TestId::A));
        assert!(tracker.commit().is_none());

        assert!(tracker.finish_exit());
        assert_eq!(tracker.phase(), TransitionPhase::Entering);
        assert_eq!(tracker.current(), Some(TestId::A));

        let commit = tracker.commit().unwrap();
        assert_eq!(commit.from, Some(TestId::A));
        assert_eq!(commit.to, TestId::B);
        assert_eq!(tracker.current(), Some(TestId::B));
    }

    #[test]
    fn begin_is_rejected_while_in_flight() {
        let mut tracker = PhaseTracker::new();
        tracker.begin(TestId::A);
        let before = tracker.clone();

        assert_eq!(tracker.begin(TestId::B), None);
        assert_eq!(tracker, before);

        tracker.commit();
        tracker.begin(TestId::B);
        let before = tracker.clone();

        assert_eq!(tracker.begin(TestId::A), None);
        assert_eq!(tracker, before);
    }

    #[test]
    fn commit_outside_entering_changes_nothing() {
        let mut tracker: PhaseTracker<TestId> = PhaseTracker::new();

        assert!(tracker.commit().is_none());
        assert_eq!(tracker.phase(), TransitionPhase::Idle);
    }

    #[test]
    fn phase_reports_transitioning() {
        assert!(!TransitionPhase::Idle.is_transitioning());
        assert!(TransitionPhase::Exiting.is_transitioning());
        assert!(TransitionPhase::Entering.is_transitioning());
        assert!(!TransitionPhase::Active.is_transitioning());
    }

    #[test]
    fn phase_displays_name() {
        assert_eq!(TransitionPhase::Exiting.to_string(), "Exiting");
        assert_eq!(TransitionPhase::default(), TransitionPhase::Idle);
    }
}
