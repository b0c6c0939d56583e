//! Transition history tracking.
//!
//! Every commit produces a `TransitionRecord`. The history keeps them in
//! commit order, optionally bounded to the most recent records.

use super::id::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{StateId, TransitionRecord};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Screen {
///     Title,
///     Playing,
/// }
///
/// impl StateId for Screen {
///     fn name(&self) -> &str {
///         match self {
///             Self::Title => "Title",
///             Self::Playing => "Playing",
///         }
///     }
/// }
///
/// let record = TransitionRecord {
///     from: Some(Screen::Title),
///     to: Screen::Playing,
///     ticks: 3,
///     committed_at_tick: 42,
///     timestamp: Utc::now(),
/// };
/// assert!(!record.is_initial());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<I: StateId> {
    /// The state left, `None` for the first activation
    pub from: Option<I>,
    /// The state committed
    pub to: I,
    /// Number of `advance` calls the transition took
    pub ticks: u64,
    /// Tick counter value at the commit
    pub committed_at_tick: u64,
    /// Wall-clock time of the commit
    pub timestamp: DateTime<Utc>,
}

impl<I: StateId> TransitionRecord<I> {
    /// Whether this record is the machine's first activation.
    pub fn is_initial(&self) -> bool {
        self.from.is_none()
    }

    /// Whether the transition left and re-entered the same state.
    pub fn is_reentry(&self) -> bool {
        self.from == Some(self.to)
    }
}

/// Ordered history of committed transitions.
///
/// `record` returns a new history with the transition added; the original
/// is left as it was. With a limit set, the oldest records are dropped once
/// the limit is reached.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{StateId, TransitionHistory, TransitionRecord};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Step { A, B, C }
///
/// impl StateId for Step {
///     fn name(&self) -> &str {
///         match self {
///             Self::A => "A",
///             Self::B => "B",
///             Self::C => "C",
///         }
///     }
/// }
///
/// let record = |from, to| TransitionRecord {
///     from,
///     to,
///     ticks: 1,
///     committed_at_tick: 0,
///     timestamp: Utc::now(),
/// };
///
/// let history = TransitionHistory::new()
///     .record(record(None, Step::A))
///     .record(record(Some(Step::A), Step::B))
///     .record(record(Some(Step::B), Step::C));
///
/// assert_eq!(history.get_path(), vec![&Step::A, &Step::B, &Step::C]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionHistory<I: StateId> {
    transitions: VecDeque<TransitionRecord<I>>,
    limit: Option<usize>,
}

impl<I: StateId> Default for TransitionHistory<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: StateId> TransitionHistory<I> {
    /// Create a new, unbounded, empty history.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: None,
        }
    }

    /// Create an empty history keeping at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: Some(limit),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: TransitionRecord<I>) -> Self {
        let mut next = self.clone();
        next.push(transition);
        next
    }

    /// Append in place. Used by the engine on every commit.
    pub(crate) fn push(&mut self, transition: TransitionRecord<I>) {
        if self.limit == Some(0) {
            return;
        }
        if let Some(limit) = self.limit {
            while self.transitions.len() >= limit {
                self.transitions.pop_front();
            }
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Starts with the `from` state of the oldest retained record (when it
    /// has one), followed by the `to` state of every record.
    pub fn get_path(&self) -> Vec<&I> {
        let mut path = Vec::new();
        if let Some(from) = self.transitions.front().and_then(|t| t.from.as_ref()) {
            path.push(from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Wall-clock time between the oldest and newest retained records.
    ///
    /// Returns `None` if there are no records.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Iterate over retained records, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord<I>> {
        self.transitions.iter()
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&TransitionRecord<I>> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestId {
        Boot,
        Menu,
        Level,
    }

    impl StateId for TestId {
        fn name(&self) -> &str {
            match self {
                Self::Boot => "Boot",
                Self::Menu => "Menu",
                Self::Level => "Level",
            }
        }
    }

    fn record(from: Option<TestId>, to: TestId) -> TransitionRecord<TestId> {
        TransitionRecord {
            from,
            to,
            ticks: 1,
            committed_at_tick: 0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: TransitionHistory<TestId> = TransitionHistory::new();

        assert!(history.is_empty());
        assert!(history.last().is_none());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_does_not_mutate_original() {
        let history = TransitionHistory::new();
        let new_history = history.record(record(None, TestId::Boot));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn get_path_starts_with_first_activation() {
        let history = TransitionHistory::new()
            .record(record(None, TestId::Boot))
            .record(record(Some(TestId::Boot), TestId::Menu));

        assert_eq!(history.get_path(), vec![&TestId::Boot, &TestId::Menu]);
    }

    #[test]
    fn limit_drops_oldest_records() {
        let history = TransitionHistory::with_limit(2)
            .record(record(None, TestId::Boot))
            .record(record(Some(TestId::Boot), TestId::Menu))
            .record(record(Some(TestId::Menu), TestId::Level));

        assert_eq!(history.len(), 2);
        assert_eq!(history.limit(), Some(2));
        assert_eq!(
            history.get_path(),
            vec![&TestId::Boot, &TestId::Menu, &TestId::Level]
        );
        assert_eq!(history.transitions().next().unwrap().to, TestId::Menu);
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let history = TransitionHistory::with_limit(0).record(record(None, TestId::Boot));

        assert!(history.is_empty());
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let start = Utc::now();
        let mut first = record(None, TestId::Boot);
        first.timestamp = start;
        let mut second = record(Some(TestId::Boot), TestId::Menu);
        second.timestamp = start + chrono::Duration::milliseconds(250);

        let history = TransitionHistory::new().record(first).record(second);

        assert_eq!(history.duration(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn reentry_is_detected() {
        assert!(record(Some(TestId::Menu), TestId::Menu).is_reentry());
        assert!(!record(Some(TestId::Boot), TestId::Menu).is_reentry());
        assert!(record(None, TestId::Boot).is_initial());
    }

    #[test]
    fn history_serializes_correctly() {
        let history = TransitionHistory::with_limit(4)
            .record(record(None, TestId::Boot))
            .record(record(Some(TestId::Boot), TestId::Level));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: TransitionHistory<TestId> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 2);
        assert_eq!(deserialized.limit(), Some(4));
        assert_eq!(deserialized.last(), history.last());
    }
}
