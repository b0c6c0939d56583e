//! State registry.
//!
//! Maps each state id to its singleton handler. A registry is built once
//! from an ordered, duplicate-free id list; its membership never changes
//! afterwards.

pub mod error;
pub mod validation;

pub use error::RegistryError;
pub use validation::validate_ids;

use crate::core::{DynHandler, HandlerFactory, StateHandler, StateId};
use std::collections::HashMap;
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Id-to-handler map owned by a machine.
pub struct StateRegistry<I: StateId, C: 'static> {
    handlers: HashMap<I, Box<DynHandler<C>>>,
    order: Vec<I>,
}

impl<I: StateId, C: 'static> StateRegistry<I, C> {
    /// Collect every problem with `ids` without building anything.
    pub fn validate(ids: &[I]) -> Validation<(), NonEmptyVec<RegistryError>> {
        validate_ids(ids)
    }

    /// Build a registry, creating one handler per id with `factory` and
    /// calling its `setup` with `context`, in registration order.
    ///
    /// Fails with the first registration problem found; the others are
    /// logged.
    pub fn build<It, F>(ids: It, context: &C, mut factory: F) -> Result<Self, RegistryError>
    where
        It: IntoIterator<Item = I>,
        F: FnMut(I) -> Box<DynHandler<C>>,
    {
        let ids: Vec<I> = ids.into_iter().collect();

        if let Validation::Failure(violations) = Self::validate(&ids) {
            let mut violations = violations.iter().cloned();
            if let Some(first) = violations.next() {
                for other in violations {
                    tracing::warn!(error = %other, "additional registration problem");
                }
                tracing::warn!(error = %first, "state registration rejected");
                return Err(first);
            }
        }

        let mut handlers = HashMap::with_capacity(ids.len());
        for id in &ids {
            let mut handler = factory(*id);
            handler.setup(context);
            tracing::debug!(state = id.name(), "registered state handler");
            handlers.insert(*id, handler);
        }

        Ok(Self {
            handlers,
            order: ids,
        })
    }

    /// Build a registry whose handlers come from `HandlerFactory::create`.
    pub fn from_factory<It>(ids: It, context: &C) -> Result<Self, RegistryError>
    where
        It: IntoIterator<Item = I>,
        I: HandlerFactory<C>,
    {
        Self::build(ids, context, |id| id.create())
    }

    /// Fetch the handler registered under `id`.
    pub fn lookup(&self, id: I) -> Result<&DynHandler<C>, RegistryError> {
        self.handlers
            .get(&id)
            .map(|handler| &**handler)
            .ok_or_else(|| not_found(id))
    }

    /// Mutably fetch the handler registered under `id`.
    pub fn lookup_mut(&mut self, id: I) -> Result<&mut DynHandler<C>, RegistryError> {
        self.handlers
            .get_mut(&id)
            .map(|handler| &mut **handler)
            .ok_or_else(|| not_found(id))
    }

    /// Fetch the handler under `id` as its concrete type.
    ///
    /// Returns `None` if `id` is unknown or the handler is not a `T`.
    pub fn lookup_as<T: StateHandler<C>>(&self, id: I) -> Option<&T> {
        self.handlers
            .get(&id)
            .and_then(|handler| (**handler).downcast_ref::<T>())
    }

    /// Mutable counterpart of [`lookup_as`](Self::lookup_as).
    pub fn lookup_as_mut<T: StateHandler<C>>(&mut self, id: I) -> Option<&mut T> {
        self.handlers
            .get_mut(&id)
            .and_then(|handler| (**handler).downcast_mut::<T>())
    }

    pub fn contains(&self, id: I) -> bool {
        self.handlers.contains_key(&id)
    }

    /// Registered ids, in registration order.
    pub fn ids(&self) -> &[I] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<I: StateId, C: 'static> fmt::Debug for StateRegistry<I, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRegistry")
            .field("states", &self.order)
            .finish_non_exhaustive()
    }
}

fn not_found<I: StateId>(id: I) -> RegistryError {
    RegistryError::NotFound {
        state: id.name().to_string(),
    }
}
