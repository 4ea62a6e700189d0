//! Builder for constructing state machines.

use std::sync::Arc;

use crate::builder::error::BuildError;
use crate::core::{Notification, State};
use crate::machine::{
    MachineConfig, RedundantTransitionPolicy, StateCenter, StateDefinition, StateMachine,
    StateMessenger,
};
use crate::notification::NotificationCenter;

/// Builder for constructing state machines with a fluent API.
///
/// States are registered in declaration order when `build` runs. If an
/// initial state was given, `build` also enters it, so observers that must
/// see the first enter notification should be attached to the center passed
/// to [`center`](Self::center) beforehand.
pub struct StateMachineBuilder<S: State, N: Notification> {
    center: Option<Arc<StateCenter<S, N>>>,
    mirror: Option<Arc<StateMessenger<S>>>,
    config: MachineConfig,
    states: Vec<StateDefinition<S, N>>,
    initial: Option<S>,
}

impl<S: State, N: Notification> StateMachineBuilder<S, N> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            center: None,
            mirror: None,
            config: MachineConfig::default(),
            states: Vec::new(),
            initial: None,
        }
    }

    /// Post through an existing center. A fresh one is created otherwise.
    pub fn center(mut self, center: Arc<StateCenter<S, N>>) -> Self {
        self.center = Some(center);
        self
    }

    /// Mirror enter/exit broadcasts onto `messenger`.
    pub fn mirror_to(mut self, messenger: Arc<StateMessenger<S>>) -> Self {
        self.mirror = Some(messenger);
        self
    }

    /// Replace the whole config.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn redundant_transitions(mut self, policy: RedundantTransitionPolicy) -> Self {
        self.config.redundant_transition = policy;
        self
    }

    pub fn max_transition_depth(mut self, depth: usize) -> Self {
        self.config.max_transition_depth = depth;
        self
    }

    pub fn record_history(mut self, enabled: bool) -> Self {
        self.config.record_history = enabled;
        self
    }

    /// Declare a state with its enter and exit notifications.
    pub fn state(mut self, state: S, enter: N, exit: N) -> Self {
        self.states.push(StateDefinition { state, enter, exit });
        self
    }

    /// Enter `state` as part of `build`.
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Build the state machine.
    /// Returns an error if the config is invalid or a declaration conflicts.
    pub fn build(self) -> Result<Arc<StateMachine<S, N>>, BuildError> {
        self.config.validate()?;

        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let center = self
            .center
            .unwrap_or_else(|| Arc::new(NotificationCenter::new()));
        let mut machine = StateMachine::with_config(center, self.config);
        if let Some(mirror) = self.mirror {
            machine = machine.with_mirror(mirror);
        }

        for StateDefinition { state, enter, exit } in self.states {
            machine.register_state(state, enter, exit)?;
        }

        let machine = Arc::new(machine);
        if let Some(initial) = self.initial {
            machine.set_initial_state(initial)?;
        }

        Ok(machine)
    }
}

impl<S: State, N: Notification> Default for StateMachineBuilder<S, N> {
    fn default() -> Self {
        Self::new()
    }
}
