//! The transition engine and its host boundary.
//!
//! A [`StateMachine`] owns the registry, the phase tracker and the running
//! enter/exit sequences. Its host supplies the context handed to handlers
//! and receives a notification for every committed transition.

pub mod config;
pub mod error;
pub mod host;
pub mod machine;

pub use config::{ConfigError, MachineConfig, DEFAULT_HISTORY_LIMIT};
pub use error::TransitionError;
pub use host::{FnHost, HostAdapter};
pub use machine::StateMachine;
