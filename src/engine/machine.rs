//! Tick-driven state machine with multi-tick enter/exit sequences.

use crate::core::{
    DynHandler, HandlerFactory, PhaseTracker, Sequence, StateHandler, StateId, Step,
    TransitionHistory, TransitionPhase, TransitionRecord,
};
use crate::engine::config::MachineConfig;
use crate::engine::error::TransitionError;
use crate::engine::host::HostAdapter;
use crate::registry::{RegistryError, StateRegistry};
use crate::snapshot::MachineSnapshot;
use chrono::Utc;

/// Handler type stored for a host `H`.
type HostHandler<I, H> = DynHandler<<H as HostAdapter<I>>::Context>;

/// State machine that runs one transition at a time across host ticks.
///
/// The host calls [`change_state`](Self::change_state) to request a
/// transition and [`advance`](Self::advance) exactly once per tick to make
/// progress on it. Between ticks the machine is inert.
pub struct StateMachine<I: StateId, H: HostAdapter<I>> {
    host: H,
    config: MachineConfig,
    registry: Option<StateRegistry<I, H::Context>>,
    tracker: PhaseTracker<I>,
    exit_sequence: Option<Sequence>,
    enter_sequence: Option<Sequence>,
    history: TransitionHistory<I>,
    tick: u64,
    requested_at: u64,
}

impl<I: StateId, H: HostAdapter<I>> StateMachine<I, H> {
    /// Create an uninitialized machine with the default configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, MachineConfig::default())
    }

    /// Create an uninitialized machine.
    ///
    /// The configuration is taken as given; `MachineBuilder` validates it.
    pub fn with_config(host: H, config: MachineConfig) -> Self {
        let history = config.new_history();
        Self {
            host,
            config,
            registry: None,
            tracker: PhaseTracker::new(),
            exit_sequence: None,
            enter_sequence: None,
            history,
            tick: 0,
            requested_at: 0,
        }
    }

    /// Register `ids`, creating each handler through `HandlerFactory`.
    pub fn initialize<It>(&mut self, ids: It) -> Result<(), RegistryError>
    where
        It: IntoIterator<Item = I>,
        I: HandlerFactory<H::Context>,
    {
        self.initialize_with(ids, |id| id.create())
    }

    /// Register `ids`, creating each handler with `factory`.
    ///
    /// Every handler's `setup` is called once with the host context. May
    /// only succeed once per machine; on failure nothing is registered and
    /// the call may be retried.
    pub fn initialize_with<It, F>(&mut self, ids: It, factory: F) -> Result<(), RegistryError>
    where
        It: IntoIterator<Item = I>,
        F: FnMut(I) -> Box<HostHandler<I, H>>,
    {
        if self.registry.is_some() {
            tracing::warn!("initialize called on an initialized machine");
            return Err(RegistryError::AlreadyInitialized);
        }
        let registry = StateRegistry::build(ids, self.host.context(), factory)?;
        tracing::debug!(states = registry.len(), "state machine initialized");
        self.registry = Some(registry);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.is_some()
    }

    /// Request a transition to `id`.
    ///
    /// From `Idle` the target's enter sequence starts right away; from
    /// `Active` the current state's exit sequence runs first. While a
    /// transition is in flight every request is rejected, never queued.
    /// A rejected request leaves the machine untouched.
    pub fn change_state(&mut self, id: I) -> Result<(), TransitionError> {
        let registry = self
            .registry
            .as_mut()
            .ok_or(TransitionError::NotInitialized)?;

        if !registry.contains(id) {
            tracing::warn!(state = id.name(), "transition to unregistered state rejected");
            return Err(unknown_state(id));
        }

        let sequence = match self.tracker.phase() {
            TransitionPhase::Exiting | TransitionPhase::Entering => {
                let error = in_flight(id, &self.tracker);
                tracing::warn!(%error, "transition request rejected");
                return Err(error);
            }
            TransitionPhase::Idle => registry
                .lookup_mut(id)
                .map_err(|_| unknown_state(id))?
                .enter(),
            TransitionPhase::Active => match self.tracker.current() {
                Some(current) => registry
                    .lookup_mut(current)
                    .map_err(|_| unknown_state(current))?
                    .exit(),
                None => Sequence::immediate(),
            },
        };

        let Some(started) = self.tracker.begin(id) else {
            return Err(in_flight(id, &self.tracker));
        };
        match started {
            TransitionPhase::Exiting => self.exit_sequence = Some(sequence),
            _ => self.enter_sequence = Some(sequence),
        }
        self.requested_at = self.tick;

        let from = self.tracker.current();
        tracing::debug!(
            from = from.as_ref().map_or("none", StateId::name),
            to = id.name(),
            phase = %started,
            "transition accepted"
        );
        Ok(())
    }

    /// Make one tick of progress on the transition in flight.
    ///
    /// - `Idle`/`Active`: nothing happens.
    /// - `Exiting`: the exit sequence is resumed once. If it completes, the
    ///   pending state's enter sequence is started and resumed within the
    ///   same call.
    /// - `Entering`: the enter sequence is resumed once.
    ///
    /// When the enter sequence completes the pending state is committed and
    /// the host is notified before this call returns. Returns the phase after
    /// the tick.
    pub fn advance(&mut self) -> TransitionPhase {
        self.tick += 1;
        match self.tracker.phase() {
            TransitionPhase::Idle | TransitionPhase::Active => {}
            TransitionPhase::Exiting => self.resume_exit(),
            TransitionPhase::Entering => self.resume_enter(),
        }
        self.tracker.phase()
    }

    fn resume_exit(&mut self) {
        let step = self
            .exit_sequence
            .as_mut()
            .map_or(Step::Complete, Sequence::resume);
        if step == Step::Suspended {
            tracing::trace!(tick = self.tick, "exit sequence suspended");
            return;
        }

        let suspensions = self
            .exit_sequence
            .take()
            .map_or(0, |sequence| sequence.suspensions());
        self.tracker.finish_exit();

        let Some(pending) = self.tracker.pending() else {
            return;
        };
        let sequence = match self
            .registry
            .as_mut()
            .and_then(|registry| registry.lookup_mut(pending).ok())
        {
            Some(handler) => handler.enter(),
            None => Sequence::immediate(),
        };
        self.enter_sequence = Some(sequence);
        tracing::debug!(
            tick = self.tick,
            suspensions,
            entering = pending.name(),
            "exit sequence complete"
        );

        self.resume_enter();
    }

    fn resume_enter(&mut self) {
        let step = self
            .enter_sequence
            .as_mut()
            .map_or(Step::Complete, Sequence::resume);
        if step == Step::Suspended {
            tracing::trace!(tick = self.tick, "enter sequence suspended");
            return;
        }
        self.commit();
    }

    fn commit(&mut self) {
        self.enter_sequence = None;
        self.exit_sequence = None;
        let Some(commit) = self.tracker.commit() else {
            return;
        };

        let record = TransitionRecord {
            from: commit.from,
            to: commit.to,
            ticks: self.tick - self.requested_at,
            committed_at_tick: self.tick,
            timestamp: Utc::now(),
        };
        self.history.push(record.clone());
        tracing::info!(
            from = commit.from.as_ref().map_or("none", StateId::name),
            to = commit.to.name(),
            ticks = record.ticks,
            "state transition committed"
        );

        self.host.on_state_changed(&record);
    }

    /// True iff a state is committed and no transition is in flight.
    ///
    /// Hosts must check this before dispatching events to the active state.
    pub fn is_ready(&self) -> bool {
        self.tracker.is_ready()
    }

    pub fn phase(&self) -> TransitionPhase {
        self.tracker.phase()
    }

    /// Id of the committed state. Stays on the old state while a
    /// transition is in flight.
    pub fn active_id(&self) -> Option<I> {
        self.tracker.current()
    }

    /// Id of the state a transition in flight is heading to.
    pub fn pending_id(&self) -> Option<I> {
        self.tracker.pending()
    }

    /// The committed handler, or `None` before the first commit.
    pub fn active_state(&self) -> Option<&HostHandler<I, H>> {
        let current = self.tracker.current()?;
        self.registry.as_ref()?.lookup(current).ok()
    }

    /// The committed handler as its concrete type.
    pub fn active_as<T: StateHandler<H::Context>>(&self) -> Option<&T> {
        let current = self.tracker.current()?;
        self.registry.as_ref()?.lookup_as::<T>(current)
    }

    /// Run `f` against the committed handler if the machine is ready.
    ///
    /// Returns `None` without calling `f` while a transition is in flight or
    /// before the first commit.
    pub fn dispatch<R, F>(&mut self, f: F) -> Option<R>
    where
        F: FnOnce(&mut HostHandler<I, H>) -> R,
    {
        if !self.is_ready() {
            return None;
        }
        let current = self.tracker.current()?;
        let handler = self.registry.as_mut()?.lookup_mut(current).ok()?;
        Some(f(handler))
    }

    /// Typed counterpart of [`dispatch`](Self::dispatch). Also returns
    /// `None` if the committed handler is not a `T`.
    pub fn dispatch_as<T, R, F>(&mut self, f: F) -> Option<R>
    where
        T: StateHandler<H::Context>,
        F: FnOnce(&mut T) -> R,
    {
        if !self.is_ready() {
            return None;
        }
        let current = self.tracker.current()?;
        let handler = self.registry.as_mut()?.lookup_as_mut::<T>(current)?;
        Some(f(handler))
    }

    /// Fetch any registered handler without transitioning to it.
    pub fn lookup(&self, id: I) -> Result<&HostHandler<I, H>, RegistryError> {
        match self.registry.as_ref() {
            Some(registry) => registry.lookup(id),
            None => Err(RegistryError::NotFound {
                state: id.name().to_string(),
            }),
        }
    }

    pub fn lookup_as<T: StateHandler<H::Context>>(&self, id: I) -> Option<&T> {
        self.registry.as_ref()?.lookup_as::<T>(id)
    }

    pub fn lookup_as_mut<T: StateHandler<H::Context>>(&mut self, id: I) -> Option<&mut T> {
        self.registry.as_mut()?.lookup_as_mut::<T>(id)
    }

    /// Registered ids in registration order; empty before initialization.
    pub fn states(&self) -> &[I] {
        self.registry
            .as_ref()
            .map(|registry| registry.ids())
            .unwrap_or(&[])
    }

    pub fn history(&self) -> &TransitionHistory<I> {
        &self.history
    }

    /// Number of `advance` calls so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Capture the observable state of the machine for diagnostics.
    pub fn snapshot(&self) -> MachineSnapshot<I> {
        MachineSnapshot::capture(self)
    }
}

fn unknown_state<I: StateId>(id: I) -> TransitionError {
    TransitionError::UnknownState {
        state: id.name().to_string(),
    }
}

fn in_flight<I: StateId>(requested: I, tracker: &PhaseTracker<I>) -> TransitionError {
    TransitionError::TransitionInFlight {
        requested: requested.name().to_string(),
        pending: tracker
            .pending()
            .as_ref()
            .map_or_else(String::new, |s| s.name().to_string()),
        phase: tracker.phase(),
    }
}
