//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder and the `state_ids!` macro for
//! declaring state ids with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::MachineBuilder;
