//! Explicit ownership of one machine and its broadcast channels.
//!
//! A level run or an editor run constructs a [`Session`] up front and hands
//! clones of its `Arc`s to collaborators. When the run ends, `teardown` drops
//! every observer binding so nothing outlives it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::builder::{BuildError, StateMachineBuilder};
use crate::core::{Notification, State};
use crate::machine::{StateCenter, StateMachine};
use crate::notification::Messenger;

/// Unique identifier for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A state machine, its notification center and a payload-less messenger for
/// UI events, tied to one run.
///
/// Dropping the session tears it down.
pub struct Session<S: State, N: Notification> {
    id: SessionId,
    machine: Arc<StateMachine<S, N>>,
    events: Arc<Messenger>,
    torn_down: AtomicBool,
}

impl<S: State, N: Notification> Session<S, N> {
    pub fn new(machine: Arc<StateMachine<S, N>>) -> Self {
        Self::with_events(machine, Arc::new(Messenger::new()))
    }

    /// Use an existing messenger for UI events.
    pub fn with_events(machine: Arc<StateMachine<S, N>>, events: Arc<Messenger>) -> Self {
        let id = SessionId::new();
        debug!("Session {} opened", id);
        Self {
            id,
            machine,
            events,
            torn_down: AtomicBool::new(false),
        }
    }

    /// Build the machine and open a session around it.
    pub fn build(builder: StateMachineBuilder<S, N>) -> Result<Self, BuildError> {
        Ok(Self::new(builder.build()?))
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn machine(&self) -> &Arc<StateMachine<S, N>> {
        &self.machine
    }

    pub fn center(&self) -> &Arc<StateCenter<S, N>> {
        self.machine.center()
    }

    pub fn events(&self) -> &Arc<Messenger> {
        &self.events
    }

    /// Drop every binding on the center, the mirror and the event messenger.
    ///
    /// Runs once; later calls return `false`. The machine keeps its current
    /// state, but transitions no longer reach anyone.
    pub fn teardown(&self) -> bool {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return false;
        }

        let bindings = self.center().binding_count();
        self.center().clear();
        if let Some(mirror) = self.machine.mirror() {
            mirror.clear();
        }
        self.events.clear();

        debug!(
            "Session {} torn down in state {:?} ({} center bindings dropped)",
            self.id,
            self.machine.current_state(),
            bindings
        );
        true
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }
}

impl<S: State, N: Notification> Drop for Session<S, N> {
    fn drop(&mut self) {
        self.teardown();
    }
}
