//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{DynHandler, HandlerFactory, StateId};
use crate::engine::{HostAdapter, MachineConfig, StateMachine};

/// Builder for constructing state machines with a fluent API.
///
/// Collects the host, the state ids and the configuration, then validates
/// and initializes the machine in one step.
pub struct MachineBuilder<I: StateId, H: HostAdapter<I>> {
    host: Option<H>,
    states: Vec<I>,
    initial: Option<I>,
    config: MachineConfig,
}

impl<I: StateId, H: HostAdapter<I>> MachineBuilder<I, H> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            host: None,
            states: Vec::new(),
            initial: None,
            config: MachineConfig::default(),
        }
    }

    /// Set the host (required).
    pub fn host(mut self, host: H) -> Self {
        self.host = Some(host);
        self
    }

    /// Register a state id.
    pub fn state(mut self, id: I) -> Self {
        self.states.push(id);
        self
    }

    /// Register several state ids at once.
    pub fn states(mut self, ids: impl IntoIterator<Item = I>) -> Self {
        self.states.extend(ids);
        self
    }

    /// Request a first transition to `id` right after initialization.
    ///
    /// The state still commits on a later `advance`, like any other
    /// transition.
    pub fn initial(mut self, id: I) -> Self {
        self.initial = Some(id);
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = Some(limit);
        self
    }

    /// Keep every transition record.
    pub fn unbounded_history(mut self) -> Self {
        self.config.history_limit = None;
        self
    }

    /// Build the machine, creating handlers with `factory`.
    /// Returns an error if required fields are missing or registration fails.
    pub fn build_with<F>(self, factory: F) -> Result<StateMachine<I, H>, BuildError>
    where
        F: FnMut(I) -> Box<DynHandler<H::Context>>,
    {
        let host = self.host.ok_or(BuildError::MissingHost)?;
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }
        self.config.validate()?;

        let mut machine = StateMachine::with_config(host, self.config);
        machine.initialize_with(self.states, factory)?;
        if let Some(initial) = self.initial {
            machine.change_state(initial)?;
        }

        Ok(machine)
    }

    /// Build the machine, creating handlers through `HandlerFactory`.
    pub fn build(self) -> Result<StateMachine<I, H>, BuildError>
    where
        I: HandlerFactory<H::Context>,
    {
        self.build_with(|id| id.create())
    }
}

impl<I: StateId, H: HostAdapter<I>> Default for MachineBuilder<I, H> {
    fn default() -> Self {
        Self::new()
    }
}
