//! Resumable enter/exit bodies.
//!
//! A `Sequence` is a finite, lazily produced stream of suspension markers.
//! The engine resumes it once per tick: each resume either suspends ("not
//! done, check again next tick") or completes. Sequences cannot be
//! restarted; once complete they stay complete.

use std::fmt;
use std::iter;

/// Marker yielded by a sequence that has more work to do on a later tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Suspend;

/// Outcome of resuming a sequence once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The sequence yielded and must be resumed again on a later tick
    Suspended,

    /// The sequence ran to its end
    Complete,
}

impl Step {
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// A resumable, possibly multi-tick unit of work.
///
/// Sequences own everything they touch (`'static`), so state that must be
/// shared with the handler that produced them goes through `Rc`/`Cell`
/// handles the handler also holds.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{Sequence, Step};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let faded = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&faded);
///
/// // Two ticks of fade-out, then flip the flag.
/// let mut exit = Sequence::ticks(2).then(Sequence::action(move || flag.set(true)));
///
/// assert_eq!(exit.resume(), Step::Suspended);
/// assert_eq!(exit.resume(), Step::Suspended);
/// assert!(!faded.get());
/// assert_eq!(exit.resume(), Step::Complete);
/// assert!(faded.get());
/// assert_eq!(exit.suspensions(), 2);
/// ```
pub struct Sequence {
    steps: Box<dyn Iterator<Item = Suspend>>,
    suspensions: u64,
    complete: bool,
}

impl Sequence {
    /// Build a sequence from any iterator of suspension markers.
    ///
    /// Each item is one suspension; the end of the iterator is completion.
    pub fn new<It>(steps: It) -> Self
    where
        It: IntoIterator<Item = Suspend>,
        It::IntoIter: 'static,
    {
        Self {
            steps: Box::new(steps.into_iter()),
            suspensions: 0,
            complete: false,
        }
    }

    /// A sequence that completes on its first resume.
    pub fn immediate() -> Self {
        Self::new(iter::empty())
    }

    /// A sequence that suspends `count` times, then completes.
    pub fn ticks(count: u32) -> Self {
        Self::new(iter::repeat(Suspend).take(count as usize))
    }

    /// A sequence driven by a poll function, resumed until it reports
    /// `Step::Complete`.
    pub fn from_fn<F>(mut poll: F) -> Self
    where
        F: FnMut() -> Step + 'static,
    {
        Self::new(iter::from_fn(move || match poll() {
            Step::Suspended => Some(Suspend),
            Step::Complete => None,
        }))
    }

    /// Suspend until `ready` returns true. The predicate is checked on every
    /// resume, including the first.
    pub fn wait_until<F>(mut ready: F) -> Self
    where
        F: FnMut() -> bool + 'static,
    {
        Self::from_fn(move || {
            if ready() {
                Step::Complete
            } else {
                Step::Suspended
            }
        })
    }

    /// Run `action` on the first resume and complete without suspending.
    pub fn action<F>(action: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        let mut action = Some(action);
        Self::from_fn(move || {
            if let Some(action) = action.take() {
                action();
            }
            Step::Complete
        })
    }

    /// Continue with `next` once this sequence completes.
    ///
    /// The hand-over happens within a single resume: if this sequence
    /// completes, `next` is resumed immediately.
    pub fn then(self, next: Sequence) -> Self {
        if self.complete {
            return next;
        }
        Self {
            steps: Box::new(self.steps.chain(next.steps)),
            suspensions: self.suspensions,
            complete: false,
        }
    }

    /// Resume the sequence by one step.
    pub fn resume(&mut self) -> Step {
        if self.complete {
            return Step::Complete;
        }
        match self.steps.next() {
            Some(Suspend) => {
                self.suspensions += 1;
                Step::Suspended
            }
            None => {
                self.complete = true;
                Step::Complete
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Number of times this sequence has suspended so far.
    pub fn suspensions(&self) -> u64 {
        self.suspensions
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::immediate()
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("suspensions", &self.suspensions)
            .field("complete", &self.complete)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn immediate_completes_on_first_resume() {
        let mut sequence = Sequence::immediate();

        assert!(!sequence.is_complete());
        assert_eq!(sequence.resume(), Step::Complete);
        assert!(sequence.is_complete());
        assert_eq!(sequence.suspensions(), 0);
    }

    #[test]
    fn ticks_suspends_exactly_count_times() {
        let mut sequence = Sequence::ticks(3);

        assert_eq!(sequence.resume(), Step::Suspended);
        assert_eq!(sequence.resume(), Step::Suspended);
        assert_eq!(sequence.resume(), Step::Suspended);
        assert_eq!(sequence.resume(), Step::Complete);
        assert_eq!(sequence.suspensions(), 3);
    }

    #[test]
    fn completed_sequence_is_not_restartable() {
        let polls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&polls);
        let mut sequence = Sequence::from_fn(move || {
            counter.set(counter.get() + 1);
            Step::Complete
        });

        assert_eq!(sequence.resume(), Step::Complete);
        assert_eq!(sequence.resume(), Step::Complete);
        assert_eq!(sequence.resume(), Step::Complete);
        assert_eq!(polls.get(), 1);
    }

    #[test]
    fn wait_until_tracks_external_flag() {
        let loaded = Rc::new(Cell::new(false));
        let flag = Rc::clone(&loaded);
        let mut sequence = Sequence::wait_until(move || flag.get());

        assert_eq!(sequence.resume(), Step::Suspended);
        assert_eq!(sequence.resume(), Step::Suspended);
        loaded.set(true);
        assert_eq!(sequence.resume(), Step::Complete);
        assert_eq!(sequence.suspensions(), 2);
    }

    #[test]
    fn action_runs_once_without_suspending() {
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);
        let mut sequence = Sequence::action(move || counter.set(counter.get() + 1));

        assert_eq!(sequence.resume(), Step::Complete);
        assert_eq!(sequence.resume(), Step::Complete);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn then_preserves_issue_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&log);
        let second = Rc::clone(&log);

        let mut sequence = Sequence::action(move || first.borrow_mut().push("first"))
            .then(Sequence::ticks(1))
            .then(Sequence::action(move || second.borrow_mut().push("second")));

        assert_eq!(sequence.resume(), Step::Suspended);
        assert_eq!(*log.borrow(), vec!["first"]);
        assert_eq!(sequence.resume(), Step::Complete);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn then_on_completed_sequence_yields_next() {
        let mut done = Sequence::immediate();
        assert_eq!(done.resume(), Step::Complete);

        let mut sequence = done.then(Sequence::ticks(1));
        assert_eq!(sequence.resume(), Step::Suspended);
        assert_eq!(sequence.resume(), Step::Complete);
    }

    #[test]
    fn new_accepts_finite_iterators() {
        let mut sequence = Sequence::new(vec![Suspend, Suspend]);

        assert_eq!(sequence.resume(), Step::Suspended);
        assert_eq!(sequence.resume(), Step::Suspended);
        assert_eq!(sequence.resume(), Step::Complete);
    }

    #[test]
    fn default_is_immediate() {
        let mut sequence = Sequence::default();
        assert!(sequence.resume().is_complete());
    }
}
