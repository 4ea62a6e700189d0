//! State transition history tracking.
//!
//! The state machine records every applied transition so a session can be
//! inspected after the fact (which modes a level passed through, and when).

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single applied transition.
///
/// `from` is `None` for the initial state of a session. `depth` is the number
/// of transitions that were in flight when this one was applied: `1` for a
/// transition requested from outside any handler, `2` for one requested from a
/// handler of that transition, and so on.
///
/// # Example
///
/// ```rust
/// use stagehand::core::{State, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
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
/// let transition = StateTransition {
///     from: Some(LevelState::InGame),
///     to: LevelState::Pause,
///     timestamp: Utc::now(),
///     depth: 1,
/// };
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left, `None` for the initial state
    pub from: Option<S>,
    /// The state being entered
    pub to: S,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
    /// Nesting depth of the transition request
    pub depth: usize,
}

/// Ordered history of applied transitions.
///
/// # Example
///
/// ```rust
/// use stagehand::core::{State, StateHistory, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Phase { One, Two, Three }
///
/// impl State for Phase {
///     fn name(&self) -> &str {
///         match self {
///             Self::One => "One",
///             Self::Two => "Two",
///             Self::Three => "Three",
///         }
///     }
/// }
///
/// let mut history = StateHistory::new();
///
/// history.record(StateTransition {
///     from: None,
///     to: Phase::One,
///     timestamp: Utc::now(),
///     depth: 1,
/// });
///
/// history.record(StateTransition {
///     from: Some(Phase::One),
///     to: Phase::Two,
///     timestamp: Utc::now(),
///     depth: 1,
/// });
///
/// history.record(StateTransition {
///     from: Some(Phase::Two),
///     to: Phase::Three,
///     timestamp: Utc::now(),
///     depth: 1,
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Phase::One, &Phase::Two, &Phase::Three]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Append a transition.
    pub fn record(&mut self, transition: StateTransition<S>) {
        self.transitions.push(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the first record when there is one, then
    /// the `to` state of each record in order.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(from) = self.transitions.first().and_then(|t| t.from.as_ref()) {
            path.push(from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions in the order they were applied.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
