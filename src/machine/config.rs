//! Machine configuration.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Default limit on nested `change_state` calls.
pub const DEFAULT_MAX_TRANSITION_DEPTH: usize = 16;

/// What `change_state` does when asked to enter the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedundantTransitionPolicy {
    /// Fail with `TransitionError::RedundantTransition`.
    #[default]
    Reject,

    /// Return `TransitionOutcome::Unchanged`.
    Ignore,
}

/// Tunables of one state machine.
///
/// Every field has a default, so a partial JSON document is valid:
///
/// ```rust
/// use stagehand::machine::{MachineConfig, RedundantTransitionPolicy};
///
/// let config = MachineConfig::from_json(r#"{ "redundant_transition": "ignore" }"#).unwrap();
/// assert_eq!(config.redundant_transition, RedundantTransitionPolicy::Ignore);
/// assert_eq!(config.max_transition_depth, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub redundant_transition: RedundantTransitionPolicy,

    /// Maximum number of `change_state` calls that may be in flight at once,
    /// counting the outermost one.
    pub max_transition_depth: usize,

    /// Record applied transitions in the machine's history.
    pub record_history: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            redundant_transition: RedundantTransitionPolicy::Reject,
            max_transition_depth: DEFAULT_MAX_TRANSITION_DEPTH,
            record_history: true,
        }
    }
}

impl MachineConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_transition_depth == 0 {
            return Err(ConfigError::ZeroTransitionDepth);
        }
        Ok(())
    }
}
