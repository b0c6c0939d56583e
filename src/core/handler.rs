//! The state handler contract.
//!
//! A handler is the behavior object behind one state id. The machine owns
//! exactly one handler per id for its whole lifetime, so a handler reuses its
//! storage across activations and must reset per-activation fields itself,
//! typically at the start of `enter`.

use super::id::StateId;
use super::sequence::Sequence;
use std::any::Any;

/// Object-safe access to `Any`, so handlers behind `dyn StateHandler` can be
/// downcast to their concrete type. Implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior of a single state.
///
/// All methods have no-op defaults, so a state overrides only what it needs.
/// `C` is the host-supplied context handed to `setup`.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{Sequence, StateHandler};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// #[derive(Default)]
/// struct Loading {
///     assets_ready: Option<Rc<Cell<bool>>>,
/// }
///
/// impl StateHandler<Rc<Cell<bool>>> for Loading {
///     fn setup(&mut self, context: &Rc<Cell<bool>>) {
///         self.assets_ready = Some(Rc::clone(context));
///     }
///
///     fn enter(&mut self) -> Sequence {
///         match self.assets_ready.clone() {
///             Some(flag) => Sequence::wait_until(move || flag.get()),
///             None => Sequence::immediate(),
///         }
///     }
/// }
/// ```
pub trait StateHandler<C>: AsAny {
    /// Called once, when the handler is registered.
    fn setup(&mut self, _context: &C) {}

    /// Produce the sequence run when this state becomes active.
    fn enter(&mut self) -> Sequence {
        Sequence::immediate()
    }

    /// Produce the sequence run when this state is left.
    fn exit(&mut self) -> Sequence {
        Sequence::immediate()
    }
}

/// A type-erased handler as stored by the registry.
pub type DynHandler<C> = dyn StateHandler<C>;

impl<C: 'static> DynHandler<C> {
    /// Borrow the handler as its concrete type.
    pub fn downcast_ref<T: StateHandler<C>>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the handler as its concrete type.
    pub fn downcast_mut<T: StateHandler<C>>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Construction of default handler instances from their id.
///
/// Implement this on an id enum to let the registry build every handler
/// from the id list alone.
pub trait HandlerFactory<C>: StateId {
    fn create(&self) -> Box<dyn StateHandler<C>>;
}
