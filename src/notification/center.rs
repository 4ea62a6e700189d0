//! Typed notification center.

use std::sync::Arc;

use super::binding::{Binding, Handler, HandlerResult, Observer, ObserverId};
use super::dispatch::Registry;
use super::error::DispatchReport;
use crate::core::Notification;

/// Registry of observers for one notification type `N` with payload `P`.
///
/// A center is constructed explicitly and shared by the collaborators of one
/// session, usually through an `Arc`. It never owns observer objects: object
/// bindings hold a weak reference, and every binding stays registered until
/// [`remove_observer`](Self::remove_observer) or [`clear`](Self::clear).
///
/// Broadcasts are synchronous. Observers run in registration order against a
/// snapshot of the binding list taken when the broadcast starts.
///
/// # Example
///
/// ```rust
/// use stagehand::core::Notification;
/// use stagehand::notification::{NotificationCenter, ObserverId};
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum ColourCollision { PlayerChangedColour, PlayerKilled }
///
/// impl Notification for ColourCollision {
///     fn name(&self) -> &str {
///         match self {
///             Self::PlayerChangedColour => "PlayerChangedColour",
///             Self::PlayerKilled => "PlayerKilled",
///         }
///     }
/// }
///
/// let center: NotificationCenter<ColourCollision, u8> = NotificationCenter::new();
/// let floor = ObserverId::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = Arc::clone(&seen);
/// center.add_observer(floor, ColourCollision::PlayerChangedColour, move |colour: &u8| {
///     sink.lock().unwrap().push(*colour);
///     Ok(())
/// });
///
/// let report = center.post_notification(&ColourCollision::PlayerChangedColour, &2);
/// assert!(report.is_clean());
/// assert_eq!(*seen.lock().unwrap(), vec![2]);
/// ```
pub struct NotificationCenter<N, P = ()> {
    registry: Registry<N, P>,
}

impl<N: Notification, P: 'static> NotificationCenter<N, P> {
    /// Creates a center with no bindings.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Binds a callback receiving the payload of `notification`.
    pub fn add_observer<F>(&self, observer: ObserverId, notification: N, handler: F)
    where
        F: Fn(&P) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_handler(observer, notification, Handler::new(handler));
    }

    /// Binds a callback that ignores the payload.
    pub fn add_observer_unit<F>(&self, observer: ObserverId, notification: N, handler: F)
    where
        F: Fn() -> HandlerResult + Send + Sync + 'static,
    {
        self.add_handler(observer, notification, Handler::unit(handler));
    }

    /// Binds a prepared [`Handler`].
    pub fn add_handler(&self, observer: ObserverId, notification: N, handler: Handler<P>) {
        self.registry
            .add(notification, Binding::callback(observer, handler));
    }

    /// Binds an observer object without taking ownership of it.
    ///
    /// The object is asked to handle `notification` each time it is posted.
    /// If it no longer exists, or reports the notification as unhandled, the
    /// broadcast records a fault for this binding and carries on.
    pub fn add_observer_object<O>(&self, observer: ObserverId, notification: N, object: &Arc<O>)
    where
        O: Observer<N, P> + 'static,
    {
        self.registry
            .add(notification, Binding::object(observer, object));
    }

    /// Removes the bindings `observer` holds on `notification`.
    ///
    /// Returns `false` when there was nothing to remove.
    pub fn remove_observer(&self, observer: ObserverId, notification: &N) -> bool {
        self.registry.remove(observer, notification)
    }

    /// Removes every binding held by `observer`.
    pub fn remove_all(&self, observer: ObserverId) -> usize {
        self.registry.remove_all(observer)
    }

    /// Drops every binding. Called when the owning session is torn down.
    pub fn clear(&self) {
        self.registry.clear();
    }

    //--- Broadcast --------------------------------------------------------

    /// Delivers `payload` to every observer of `notification`.
    pub fn post_notification(&self, notification: &N, payload: &P) -> DispatchReport {
        self.registry.dispatch(notification, payload)
    }

    //--- Query API --------------------------------------------------------

    pub fn observer_count(&self, notification: &N) -> usize {
        self.registry.count(notification)
    }

    pub fn is_observing(&self, observer: ObserverId, notification: &N) -> bool {
        self.registry.contains(observer, notification)
    }

    /// Total number of bindings across all notifications.
    pub fn binding_count(&self) -> usize {
        self.registry.total()
    }
}

impl<N: Notification> NotificationCenter<N, ()> {
    /// Posts a notification that carries no payload.
    pub fn post(&self, notification: &N) -> DispatchReport {
        self.post_notification(notification, &())
    }
}

impl<N: Notification, P: 'static> Default for NotificationCenter<N, P> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
