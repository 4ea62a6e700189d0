//! Core identity and payload types.
//!
//! This module contains the value types shared by every other module:
//! - State and notification identities via the `State` and `Notification` traits
//! - The `StateChangeData` payload of enter/exit notifications
//! - Transition history tracking

mod change;
mod history;
mod state;

pub use change::StateChangeData;
pub use history::{StateHistory, StateTransition};
pub use state::{Notification, State};
