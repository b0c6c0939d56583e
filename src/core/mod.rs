//! Core state machine types.
//!
//! This module contains the building blocks the engine is made of:
//! - State identifiers via the `StateId` trait
//! - Resumable enter/exit bodies via `Sequence`
//! - The `StateHandler` contract implemented by host states
//! - Phase bookkeeping via `PhaseTracker`
//! - Bounded transition history
//!
//! Nothing in here runs on its own; `engine::StateMachine` drives it.

mod handler;
mod history;
mod id;
mod phase;
mod sequence;

pub use handler::{AsAny, DynHandler, HandlerFactory, StateHandler};
pub use history::{TransitionHistory, TransitionRecord};
pub use id::StateId;
pub use phase::{Commit, PhaseTracker, TransitionPhase};
pub use sequence::{Sequence, Step, Suspend};
