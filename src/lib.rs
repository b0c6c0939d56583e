//! Tickstate: a tick-driven state machine runtime
//!
//! Tickstate runs transitions between a fixed set of states inside a host's
//! own update loop. Each state's enter and exit behavior is a resumable
//! [`Sequence`](core::Sequence) that may span many ticks; the host calls
//! `advance` once per tick and the machine makes exactly one step of progress.
//! Only one transition runs at a time and requests made during one are
//! rejected, never queued.
//!
//! # Core Concepts
//!
//! - **StateId**: Type-safe, copyable state identifiers
//! - **StateHandler**: Singleton per-state object with `setup`, `enter` and `exit`
//! - **Sequence**: Resumable enter/exit body that suspends between ticks
//! - **Phase**: `Idle`, `Exiting`, `Entering` or `Active`
//! - **Host**: Supplies the setup context and hears about committed transitions
//!
//! # Example
//!
//! ```rust
//! use tickstate::core::{Sequence, StateHandler, TransitionPhase};
//! use tickstate::engine::StateMachine;
//! use tickstate::state_ids;
//!
//! #[derive(Default)]
//! struct TitleScreen;
//!
//! impl StateHandler<()> for TitleScreen {
//!     fn exit(&mut self) -> Sequence {
//!         // Fade out over two ticks.
//!         Sequence::ticks(2)
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Gameplay;
//!
//! impl StateHandler<()> for Gameplay {}
//!
//! state_ids! {
//!     enum Screen {
//!         Title => TitleScreen,
//!         Playing => Gameplay,
//!     }
//!     context: ()
//! }
//!
//! let mut machine = StateMachine::new(());
//! machine.initialize(Screen::ALL.iter().copied()).unwrap();
//!
//! machine.change_state(Screen::Title).unwrap();
//! assert_eq!(machine.advance(), TransitionPhase::Active);
//!
//! machine.change_state(Screen::Playing).unwrap();
//! assert!(machine.change_state(Screen::Title).is_err());
//!
//! machine.advance();
//! machine.advance();
//! assert_eq!(machine.advance(), TransitionPhase::Active);
//! assert_eq!(machine.active_id(), Some(Screen::Playing));
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod registry;
pub mod snapshot;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use core::{
    HandlerFactory, Sequence, StateHandler, StateId, Step, TransitionHistory, TransitionPhase,
    TransitionRecord,
};
pub use engine::{FnHost, HostAdapter, MachineConfig, StateMachine, TransitionError};
pub use registry::RegistryError;
pub use snapshot::{MachineSnapshot, SnapshotError};
