//! The state machine and its configuration.

mod config;
mod error;
mod state_machine;

pub use config::{MachineConfig, RedundantTransitionPolicy, DEFAULT_MAX_TRANSITION_DEPTH};
pub use error::{ConfigError, TransitionError};
pub use state_machine::{StateCenter, StateMachine, StateMessenger, TransitionOutcome};

pub(crate) use state_machine::StateDefinition;
