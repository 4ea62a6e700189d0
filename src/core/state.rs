//! Identity traits for states and notifications.
//!
//! A state machine is parameterised by exactly one state enumeration and one
//! notification enumeration. Both are plain value types: comparable, hashable
//! and carrying a symbolic name used in logs, errors and messenger keys.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identities.
///
/// # Required Traits
///
/// - `Clone` + `Eq` + `Hash`: states key the machine's registry
/// - `Debug`: states are debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states appear in serializable history dumps
///
/// # Example
///
/// ```rust
/// use stagehand::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum LevelState {
///     InGame,
///     Pause,
/// }
///
/// impl State for LevelState {
///     fn name(&self) -> &str {
///         match self {
///             Self::InGame => "InGame",
///             Self::Pause => "Pause",
///         }
///     }
/// }
///
/// assert_eq!(LevelState::Pause.name(), "Pause");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Symbolic name of the state, used for display and logging.
    fn name(&self) -> &str;
}

/// Trait for notification identities.
///
/// A notification names a broadcast channel. Identities are namespaced by
/// their type: two enums may both contain a `Started` variant without
/// colliding, since each gets its own registry.
///
/// `String` implements this trait so flat string keys can be used as channels
/// (see [`Messenger`](crate::notification::Messenger)).
pub trait Notification: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Symbolic name of the channel.
    fn name(&self) -> &str;
}

impl Notification for String {
    fn name(&self) -> &str {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        InGame,
        Pause,
        EndGame,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::InGame => "InGame",
                Self::Pause => "Pause",
                Self::EndGame => "EndGame",
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestNotification {
        PauseEnter,
        PauseExit,
    }

    impl Notification for TestNotification {
        fn name(&self) -> &str {
            match self {
                Self::PauseEnter => "PauseEnter",
                Self::PauseExit => "PauseExit",
            }
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::InGame.name(), "InGame");
        assert_eq!(TestState::Pause.name(), "Pause");
        assert_eq!(TestState::EndGame.name(), "EndGame");
    }

    #[test]
    fn notification_name_returns_correct_value() {
        assert_eq!(TestNotification::PauseEnter.name(), "PauseEnter");
        assert_eq!(TestNotification::PauseExit.name(), "PauseExit");
    }

    #[test]
    fn string_is_its_own_channel_name() {
        let key = String::from("ObjectPlaced");
        assert_eq!(key.name(), "ObjectPlaced");
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Pause;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }

    #[test]
    fn state_is_hashable() {
        let mut set = std::collections::HashSet::new();
        set.insert(TestState::InGame);
        set.insert(TestState::InGame);
        set.insert(TestState::Pause);
        assert_eq!(set.len(), 2);
    }
}
