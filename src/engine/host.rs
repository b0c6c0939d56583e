//! The host boundary.
//!
//! The engine needs two things from whoever drives it: the context payload
//! handed to every handler's `setup`, and somewhere to report committed
//! transitions. Everything else about the host is its own business.

use crate::core::{StateId, TransitionRecord};
use std::fmt;

/// Contract between the engine and its host.
pub trait HostAdapter<I: StateId> {
    /// Payload forwarded verbatim to every handler's `setup`.
    type Context: 'static;

    fn context(&self) -> &Self::Context;

    /// Called synchronously from `advance` each time a transition commits,
    /// including the first activation.
    fn on_state_changed(&mut self, _record: &TransitionRecord<I>) {}
}

/// A host with no context and no interest in notifications.
impl<I: StateId> HostAdapter<I> for () {
    type Context = ();

    fn context(&self) -> &() {
        self
    }
}

/// A host assembled from a context value and a notification closure.
///
/// # Example
///
/// ```rust
/// use tickstate::engine::FnHost;
/// use tickstate::core::TransitionRecord;
/// use tickstate::state_ids;
///
/// state_ids! {
///     enum Screen {
///         Title,
///         Playing,
///     }
/// }
///
/// let host = FnHost::new("assets/", |root: &&str, record: &TransitionRecord<Screen>| {
///     println!("{root}: now in {:?}", record.to);
/// });
/// ```
pub struct FnHost<C, F> {
    context: C,
    on_change: F,
}

impl<C, F> FnHost<C, F> {
    pub fn new<I>(context: C, on_change: F) -> Self
    where
        I: StateId,
        F: FnMut(&C, &TransitionRecord<I>),
    {
        Self { context, on_change }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }
}

impl<I, C, F> HostAdapter<I> for FnHost<C, F>
where
    I: StateId,
    C: 'static,
    F: FnMut(&C, &TransitionRecord<I>),
{
    type Context = C;

    fn context(&self) -> &C {
        &self.context
    }

    fn on_state_changed(&mut self, record: &TransitionRecord<I>) {
        (self.on_change)(&self.context, record);
    }
}

impl<C: fmt::Debug, F> fmt::Debug for FnHost<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHost")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestId {
        Title,
        Playing,
    }

    impl StateId for TestId {
        fn name(&self) -> &str {
            match self {
                Self::Title => "Title",
                Self::Playing => "Playing",
            }
        }
    }

    fn record(from: Option<TestId>, to: TestId) -> TransitionRecord<TestId> {
        TransitionRecord {
            from,
            to,
            ticks: 1,
            committed_at_tick: 1,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn unit_host_ignores_notifications() {
        let mut host = ();
        HostAdapter::<TestId>::on_state_changed(&mut host, &record(None, TestId::Title));
        assert_eq!(HostAdapter::<TestId>::context(&host), &());
    }

    #[test]
    fn fn_host_forwards_context_and_record() {
        let mut seen = Vec::new();
        {
            let mut host = FnHost::new(10u32, |context: &u32, record: &TransitionRecord<TestId>| {
                seen.push((*context, record.from, record.to));
            });
            host.on_state_changed(&record(None, TestId::Title));
            *host.context_mut() += 1;
            host.on_state_changed(&record(Some(TestId::Title), TestId::Playing));
            assert_eq!(*HostAdapter::<TestId>::context(&host), 11);
            assert_eq!(*host.context(), 11);
        }

        assert_eq!(
            seen,
            vec![
                (10, None, TestId::Title),
                (11, Some(TestId::Title), TestId::Playing)
            ]
        );
    }
}
