//! Macros for declaring state and notification enums.

/// Generate a `State` implementation for a fieldless enum.
///
/// The enum derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Debug` and
/// serde's `Serialize`/`Deserialize` (the calling crate must depend on
/// `serde`). `name()` returns the variant name, and `ALL` lists the variants
/// in declaration order.
///
/// # Example
///
/// ```
/// use stagehand::core::State;
/// use stagehand::state_enum;
///
/// state_enum! {
///     pub enum LevelState {
///         InGame,
///         Pause,
///         EndGame,
///         CutScene,
///         ExitingLevel,
///     }
/// }
///
/// assert_eq!(LevelState::CutScene.name(), "CutScene");
/// assert_eq!(LevelState::ALL.len(), 5);
/// ```
#[macro_export]
macro_rules! state_enum {
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
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            #[allow(dead_code)]
            $vis const ALL: &'static [Self] = &[$(Self::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate a `Notification` implementation for a fieldless enum.
///
/// Same shape as [`state_enum!`] minus the serde derives.
///
/// ```
/// use stagehand::core::Notification;
/// use stagehand::notification_enum;
///
/// notification_enum! {
///     pub enum PauseNotification {
///         PauseEnter,
///         PauseExit,
///     }
/// }
///
/// assert_eq!(PauseNotification::PauseExit.name(), "PauseExit");
/// ```
#[macro_export]
macro_rules! notification_enum {
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
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            #[allow(dead_code)]
            $vis const ALL: &'static [Self] = &[$(Self::$variant),*];
        }

        impl $crate::core::Notification for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
