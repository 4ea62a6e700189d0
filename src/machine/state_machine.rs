//! State machine that announces transitions through a notification center.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};
use parking_lot::{Mutex, MutexGuard, ReentrantMutex, ReentrantMutexGuard};

use super::config::{MachineConfig, RedundantTransitionPolicy};
use super::error::TransitionError;
use crate::core::{Notification, State, StateChangeData, StateHistory, StateTransition};
use crate::notification::{DispatchFault, DispatchReport, Messenger, NotificationCenter};

/// Notification center carrying transition payloads for states `S`.
///
/// Only enter and exit notifications belong here. Notifications that carry no
/// state change, such as "level started", go through a separate
/// `NotificationCenter<N, ()>` and are posted with
/// [`post`](NotificationCenter::post).
pub type StateCenter<S, N> = NotificationCenter<N, StateChangeData<S>>;

/// Messenger mirroring transition payloads under notification names.
pub type StateMessenger<S> = Messenger<StateChangeData<S>>;

/// A declared state and the notifications posted when entering and leaving it.
#[derive(Clone, Debug)]
pub(crate) struct StateDefinition<S, N> {
    pub(crate) state: S,
    pub(crate) enter: N,
    pub(crate) exit: N,
}

/// Result of a successful `change_state` call.
#[derive(Debug)]
pub enum TransitionOutcome<S: State> {
    /// The machine moved; both broadcasts ran.
    Changed {
        change: StateChangeData<S>,
        exit: DispatchReport,
        enter: DispatchReport,
    },

    /// The target was the current state and the policy is `Ignore`.
    Unchanged,

    /// An exit handler moved the machine elsewhere before this transition
    /// could be applied. The exit broadcast ran; the enter broadcast did not.
    Superseded {
        change: StateChangeData<S>,
        exit: DispatchReport,
    },
}

impl<S: State> TransitionOutcome<S> {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }

    pub fn change(&self) -> Option<&StateChangeData<S>> {
        match self {
            Self::Changed { change, .. } | Self::Superseded { change, .. } => Some(change),
            Self::Unchanged => None,
        }
    }

    /// Observer faults raised by this transition's own broadcasts.
    pub fn faults(&self) -> Vec<&DispatchFault> {
        match self {
            Self::Changed { exit, enter, .. } => {
                exit.faults().iter().chain(enter.faults()).collect()
            }
            Self::Superseded { exit, .. } => exit.faults().iter().collect(),
            Self::Unchanged => Vec::new(),
        }
    }
}

struct Inner<S: State, N> {
    definitions: HashMap<S, StateDefinition<S, N>>,
    order: Vec<S>,
    current: Option<S>,
    history: StateHistory<S>,
}

impl<S: State, N: Notification> Inner<S, N> {
    fn owner_of(&self, notification: &N) -> Option<&S> {
        self.definitions
            .values()
            .find(|def| def.enter == *notification || def.exit == *notification)
            .map(|def| &def.state)
    }
}

/// Holds the transition lock and counts one nested transition of the
/// owning thread for as long as it lives.
struct DepthGuard<'a> {
    lock: ReentrantMutexGuard<'a, Cell<usize>>,
    depth: usize,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.lock.set(self.depth - 1);
    }
}

/// Registry of states plus the single transition entry point.
///
/// Each registered state is bound to an enter and an exit notification. A
/// transition posts the exit notification of the current state, updates the
/// current state, then posts the enter notification of the new one, all
/// before `change_state` returns.
///
/// Handlers may call back into the machine. A nested transition runs to
/// completion before the outer broadcast continues, up to
/// `MachineConfig::max_transition_depth` transitions deep.
///
/// The machine is `Send + Sync`; share it through an `Arc` and capture a
/// `Weak` in handlers that need to request transitions. Transitions from
/// different threads are serialised: a second thread waits until the first
/// thread's transition, nested ones included, has finished. A handler must
/// not block on another thread that transitions the same machine.
pub struct StateMachine<S: State, N: Notification> {
    center: Arc<StateCenter<S, N>>,
    mirror: Option<Arc<StateMessenger<S>>>,
    config: MachineConfig,
    inner: Mutex<Inner<S, N>>,
    transitions: ReentrantMutex<Cell<usize>>,
}

impl<S: State, N: Notification> StateMachine<S, N> {
    //--- Construction -----------------------------------------------------

    /// Create a machine posting through `center`, with default config.
    pub fn new(center: Arc<StateCenter<S, N>>) -> Self {
        Self::with_config(center, MachineConfig::default())
    }

    /// Create a machine with explicit config.
    ///
    /// The config is used as given; a `max_transition_depth` of zero rejects
    /// every transition. [`StateMachineBuilder`](crate::builder::StateMachineBuilder)
    /// validates it first.
    pub fn with_config(center: Arc<StateCenter<S, N>>, config: MachineConfig) -> Self {
        Self {
            center,
            mirror: None,
            config,
            inner: Mutex::new(Inner {
                definitions: HashMap::new(),
                order: Vec::new(),
                current: None,
                history: StateHistory::new(),
            }),
            transitions: ReentrantMutex::new(Cell::new(0)),
        }
    }

    /// Also deliver every enter/exit payload to `messenger`, keyed by the
    /// notification's name, after the center's observers have run.
    pub fn with_mirror(mut self, messenger: Arc<StateMessenger<S>>) -> Self {
        self.mirror = Some(messenger);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S, N>> {
        self.inner.lock()
    }

    //--- Registration -----------------------------------------------------

    /// Declare `state` with its enter and exit notifications.
    pub fn register_state(&self, state: S, enter: N, exit: N) -> Result<(), TransitionError> {
        let mut inner = self.lock();

        if inner.definitions.contains_key(&state) {
            return Err(TransitionError::DuplicateState {
                state: state.name().to_string(),
            });
        }

        if enter == exit {
            return Err(TransitionError::DuplicateNotification {
                notification: enter.name().to_string(),
                bound_to: state.name().to_string(),
            });
        }

        for notification in [&enter, &exit] {
            if let Some(owner) = inner.owner_of(notification) {
                return Err(TransitionError::DuplicateNotification {
                    notification: notification.name().to_string(),
                    bound_to: owner.name().to_string(),
                });
            }
        }

        if inner.current.is_some() {
            debug!("Registering state {:?} after the initial state was set", state);
        }
        debug!(
            "Registered state {:?} (enter: {:?}, exit: {:?})",
            state, enter, exit
        );

        inner.order.push(state.clone());
        inner
            .definitions
            .insert(state.clone(), StateDefinition { state, enter, exit });
        Ok(())
    }

    //--- Transitions ------------------------------------------------------

    /// Enter the first state of the session.
    ///
    /// Posts `enter(state)` with no previous state. May only succeed once.
    pub fn set_initial_state(&self, state: S) -> Result<DispatchReport, TransitionError> {
        let guard = self.enter_depth(&state)?;

        let enter = {
            let mut inner = self.lock();

            if let Some(current) = &inner.current {
                return Err(TransitionError::InvalidTransition {
                    reason: format!(
                        "initial state already set (current state is '{}')",
                        current.name()
                    ),
                });
            }

            let enter = inner
                .definitions
                .get(&state)
                .map(|def| def.enter.clone())
                .ok_or_else(|| unregistered(&state))?;

            inner.current = Some(state.clone());
            if self.config.record_history {
                inner.history.record(StateTransition {
                    from: None,
                    to: state.clone(),
                    timestamp: Utc::now(),
                    depth: guard.depth,
                });
            }
            enter
        };

        debug!("Initial state {:?}", state);
        Ok(self.broadcast(&enter, &StateChangeData::initial(state)))
    }

    /// Move to `new_state`.
    ///
    /// Posts `exit(current)`, makes `new_state` current, then posts
    /// `enter(new_state)`. Both broadcasts carry
    /// `{ previous: current, new: new_state }`.
    pub fn change_state(&self, new_state: S) -> Result<TransitionOutcome<S>, TransitionError> {
        let guard = self.enter_depth(&new_state)?;

        let (previous, exit, enter) = {
            let inner = self.lock();

            let Some(current) = inner.current.clone() else {
                return Err(TransitionError::InvalidTransition {
                    reason: format!(
                        "cannot change to '{}' before an initial state is set",
                        new_state.name()
                    ),
                });
            };

            let enter = inner
                .definitions
                .get(&new_state)
                .map(|def| def.enter.clone())
                .ok_or_else(|| unregistered(&new_state))?;

            if current == new_state {
                return match self.config.redundant_transition {
                    RedundantTransitionPolicy::Reject => Err(TransitionError::RedundantTransition {
                        state: current.name().to_string(),
                    }),
                    RedundantTransitionPolicy::Ignore => {
                        debug!("Ignoring transition to current state {:?}", current);
                        Ok(TransitionOutcome::Unchanged)
                    }
                };
            }

            let exit = inner
                .definitions
                .get(&current)
                .map(|def| def.exit.clone())
                .ok_or_else(|| unregistered(&current))?;

            (current, exit, enter)
        };

        debug!(
            "Transition {:?} -> {:?} (depth {})",
            previous, new_state, guard.depth
        );
        let change = StateChangeData::transition(previous.clone(), new_state.clone());

        let exit_report = self.broadcast(&exit, &change);

        {
            let mut inner = self.lock();
            if inner.current.as_ref() != Some(&previous) {
                warn!(
                    "Transition {:?} -> {:?} superseded: an exit handler moved the machine to {:?}",
                    previous, new_state, inner.current
                );
                return Ok(TransitionOutcome::Superseded {
                    change,
                    exit: exit_report,
                });
            }

            inner.current = Some(new_state.clone());
            if self.config.record_history {
                inner.history.record(StateTransition {
                    from: Some(previous),
                    to: new_state,
                    timestamp: Utc::now(),
                    depth: guard.depth,
                });
            }
        }

        let enter_report = self.broadcast(&enter, &change);

        Ok(TransitionOutcome::Changed {
            change,
            exit: exit_report,
            enter: enter_report,
        })
    }

    fn enter_depth(&self, target: &S) -> Result<DepthGuard<'_>, TransitionError> {
        // Reentrant for the owning thread, blocks every other thread.
        let lock = self.transitions.lock();
        let depth = lock.get() + 1;
        lock.set(depth);
        let guard = DepthGuard { lock, depth };

        let limit = self.config.max_transition_depth;
        if depth > limit {
            warn!(
                "Refusing transition to {:?}: {} transitions already in flight",
                target,
                depth - 1
            );
            return Err(TransitionError::TransitionDepthExceeded {
                target: target.name().to_string(),
                limit,
            });
        }
        Ok(guard)
    }

    fn broadcast(&self, notification: &N, change: &StateChangeData<S>) -> DispatchReport {
        let mut report = self.center.post_notification(notification, change);
        if let Some(mirror) = &self.mirror {
            report.merge(mirror.invoke(notification.name(), change));
        }
        report
    }

    //--- Query API --------------------------------------------------------

    pub fn current_state(&self) -> Option<S> {
        self.lock().current.clone()
    }

    pub fn is_in_state(&self, state: &S) -> bool {
        self.lock().current.as_ref() == Some(state)
    }

    /// True once `set_initial_state` has succeeded.
    pub fn is_started(&self) -> bool {
        self.lock().current.is_some()
    }

    pub fn is_registered(&self, state: &S) -> bool {
        self.lock().definitions.contains_key(state)
    }

    /// Registered states, in registration order.
    pub fn registered_states(&self) -> Vec<S> {
        self.lock().order.clone()
    }

    /// Snapshot of the recorded transitions.
    pub fn history(&self) -> StateHistory<S> {
        self.lock().history.clone()
    }

    /// Number of transitions the calling thread is currently dispatching.
    pub fn transition_depth(&self) -> usize {
        self.transitions.try_lock().map_or(0, |depth| depth.get())
    }

    pub fn center(&self) -> &Arc<StateCenter<S, N>> {
        &self.center
    }

    pub fn mirror(&self) -> Option<&Arc<StateMessenger<S>>> {
        self.mirror.as_ref()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }
}

fn unregistered<S: State>(state: &S) -> TransitionError {
    TransitionError::UnregisteredState {
        state: state.name().to_string(),
    }
}

//=========================================================================
// Tests
//=========================================================================
