//! Macros for declaring state id enums.

/// Declare a state id enum and implement [`StateId`](crate::core::StateId)
/// for it.
///
/// The enum gets the derives `StateId` requires and an `ALL` constant
/// listing its variants in declaration order, ready to hand to
/// `initialize`.
///
/// Mapping each variant to a handler type additionally implements
/// [`HandlerFactory`](crate::core::HandlerFactory) for the given context.
/// Handler types must implement `Default`.
///
/// # Example
///
/// ```
/// use tickstate::core::{Sequence, StateHandler, StateId};
/// use tickstate::state_ids;
///
/// state_ids! {
///     pub enum Menu {
///         Main,
///         Options,
///     }
/// }
///
/// assert_eq!(Menu::Options.name(), "Options");
/// assert_eq!(Menu::ALL, &[Menu::Main, Menu::Options]);
///
/// #[derive(Default)]
/// struct Splash;
///
/// impl StateHandler<()> for Splash {
///     fn enter(&mut self) -> Sequence {
///         Sequence::ticks(30)
///     }
/// }
///
/// #[derive(Default)]
/// struct Game;
///
/// impl StateHandler<()> for Game {}
///
/// state_ids! {
///     enum Screen {
///         Intro => Splash,
///         Playing => Game,
///     }
///     context: ()
/// }
/// ```
#[macro_export]
macro_rules! state_ids {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $handler:ty
            ),* $(,)?
        }

        context: $context:ty
    ) => {
        $crate::state_ids! {
            $(#[$meta])*
            $vis enum $name {
                $(
                    $(#[$variant_meta])*
                    $variant
                ),*
            }
        }

        impl $crate::core::HandlerFactory<$context> for $name {
            fn create(&self) -> Box<dyn $crate::core::StateHandler<$context>> {
                match self {
                    $(Self::$variant => Box::new(<$handler as Default>::default())),*
                }
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];
        }

        impl $crate::core::StateId for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
