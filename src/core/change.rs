//! Payload delivered with enter and exit notifications.

use super::state::State;
use serde::{Deserialize, Serialize};

/// Transition context carried by every enter/exit notification.
///
/// `previous` is `None` only for the enter notification posted by
/// `set_initial_state`. An exit notification and the enter notification that
/// follows it carry the same value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateChangeData<S: State> {
    /// State the machine is leaving, if any.
    pub previous: Option<S>,
    /// State the machine is entering.
    pub new: S,
}

impl<S: State> StateChangeData<S> {
    /// Payload for the first enter notification of a session.
    pub fn initial(state: S) -> Self {
        Self {
            previous: None,
            new: state,
        }
    }

    /// Payload for a transition between two registered states.
    pub fn transition(previous: S, new: S) -> Self {
        Self {
            previous: Some(previous),
            new,
        }
    }

    pub fn is_initial(&self) -> bool {
        self.previous.is_none()
    }
}
