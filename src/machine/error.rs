//! Structural errors raised by the state machine.

use thiserror::Error;

/// Errors returned by state registration and transition requests.
///
/// These are wiring mistakes: the offending call is aborted and nothing is
/// posted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("State '{state}' is already registered")]
    DuplicateState { state: String },

    #[error("Notification '{notification}' is already bound to state '{bound_to}'")]
    DuplicateNotification {
        notification: String,
        bound_to: String,
    },

    #[error("State '{state}' is not registered")]
    UnregisteredState { state: String },

    #[error("Invalid transition: {reason}")]
    InvalidTransition { reason: String },

    #[error("State machine is already in state '{state}'")]
    RedundantTransition { state: String },

    #[error("Transition to '{target}' exceeds the nested transition limit of {limit}")]
    TransitionDepthExceeded { target: String, limit: usize },
}

/// Errors raised while loading a [`MachineConfig`](super::MachineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse machine config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_transition_depth must be at least 1")]
    ZeroTransitionDepth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_identity() {
        let error = TransitionError::DuplicateNotification {
            notification: "PauseEnter".to_string(),
            bound_to: "Pause".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Notification 'PauseEnter' is already bound to state 'Pause'"
        );

        let error = TransitionError::TransitionDepthExceeded {
            target: "InGame".to_string(),
            limit: 4,
        };
        assert!(error.to_string().contains("limit of 4"));
    }

    #[test]
    fn transition_errors_are_comparable() {
        let a = TransitionError::RedundantTransition {
            state: "Pause".to_string(),
        };
        assert_eq!(a.clone(), a);
    }
}
