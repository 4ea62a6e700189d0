//! Build errors for the state machine builder.

use thiserror::Error;

use crate::machine::{ConfigError, TransitionError};

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No states declared. Call .state(state, enter, exit) before .build()")]
    NoStates,

    #[error("Invalid machine config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}
