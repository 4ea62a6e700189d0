//! Synchronous publish/subscribe plumbing.
//!
//! - [`NotificationCenter`]: channels named by a typed `Notification` enum
//! - [`Messenger`]: channels named by flat strings, for UI and editor events
//!
//! Both share one dispatch policy: observers run in registration order, each
//! broadcast iterates a snapshot taken when it starts, and a failing observer
//! is logged and skipped without stopping the others.

mod binding;
mod center;
mod dispatch;
mod error;
mod messenger;

pub use binding::{BoxError, Handler, HandlerResult, Observer, ObserverId, Resolution};
pub use center::NotificationCenter;
pub use error::{DispatchFault, DispatchReport};
pub use messenger::Messenger;
