//! State identifiers.
//!
//! Every state registered with a machine is named by a `StateId`. Ids are
//! plain values: cheap to copy, hashable, and serializable so that
//! transition records and snapshots can carry them.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Key naming one state variant within a machine.
///
/// Enum discriminants are the intended representation, so that transition
/// sites can be matched exhaustively. The [`state_ids!`](crate::state_ids)
/// macro generates a conforming enum.
///
/// # Required Traits
///
/// - `Copy` + `Eq` + `Hash`: ids are used as registry keys and role labels
/// - `Debug`: ids appear in diagnostics
/// - `Serialize` + `Deserialize`: ids appear in history and snapshots
///
/// # Example
///
/// ```rust
/// use tickstate::core::StateId;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Screen {
///     Title,
///     Playing,
///     Paused,
/// }
///
/// impl StateId for Screen {
///     fn name(&self) -> &str {
///         match self {
///             Self::Title => "Title",
///             Self::Playing => "Playing",
///             Self::Paused => "Paused",
///         }
///     }
/// }
///
/// assert_eq!(Screen::Paused.name(), "Paused");
/// ```
pub trait StateId:
    Copy + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}
