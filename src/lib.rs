//! Stagehand: typed state machines that announce their transitions
//!
//! A [`StateMachine`] owns a set of declared states, each bound to an enter
//! and an exit notification. Changing state posts the exit notification of the
//! old state and then the enter notification of the new one through a
//! [`NotificationCenter`], so camera rigs, menus and dialogue players react to
//! mode changes without knowing about each other.
//!
//! # Core Concepts
//!
//! - **State / Notification**: strongly-typed identities via the traits in [`core`]
//! - **NotificationCenter**: ordered, fault-isolated synchronous broadcasts
//! - **Messenger**: the same contract keyed by flat strings, for UI events
//! - **Session**: explicit ownership and teardown of one run's channels
//!
//! # Example
//!
//! ```rust
//! use stagehand::notification::ObserverId;
//! use stagehand::{notification_enum, state_enum, StateMachineBuilder};
//! use std::sync::{Arc, Mutex};
//!
//! state_enum! {
//!     enum LevelState {
//!         InGame,
//!         Pause,
//!     }
//! }
//!
//! notification_enum! {
//!     enum LevelNotification {
//!         InGameEnter,
//!         InGameExit,
//!         PauseEnter,
//!         PauseExit,
//!     }
//! }
//!
//! let machine = StateMachineBuilder::new()
//!     .state(LevelState::InGame, LevelNotification::InGameEnter, LevelNotification::InGameExit)
//!     .state(LevelState::Pause, LevelNotification::PauseEnter, LevelNotification::PauseExit)
//!     .build()
//!     .unwrap();
//!
//! let paused = Arc::new(Mutex::new(false));
//! let flag = Arc::clone(&paused);
//! machine.center().add_observer_unit(ObserverId::new(), LevelNotification::PauseEnter, move || {
//!     *flag.lock().unwrap() = true;
//!     Ok(())
//! });
//!
//! machine.set_initial_state(LevelState::InGame).unwrap();
//! machine.change_state(LevelState::Pause).unwrap();
//!
//! assert!(*paused.lock().unwrap());
//! assert!(machine.is_in_state(&LevelState::Pause));
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod notification;
pub mod session;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use crate::core::{Notification, State, StateChangeData, StateHistory, StateTransition};
pub use machine::{MachineConfig, StateMachine, TransitionError, TransitionOutcome};
pub use notification::{DispatchReport, Messenger, NotificationCenter, ObserverId};
pub use session::{Session, SessionId};
