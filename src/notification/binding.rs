//! Observer bindings and their resolution at dispatch time.

use super::error::DispatchFault;
use crate::core::Notification;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Boxed error returned by failing handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type of every handler.
///
/// Handlers return `Err` to report a fault; a nested `change_state` failure
/// can be propagated with `?`.
pub type HandlerResult = Result<(), BoxError>;

/// Identity of an observer.
///
/// The registry keys bindings by this id instead of holding the observer
/// itself, so removal is explicit: `remove_observer(id, notification)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObserverId(Uuid);

impl ObserverId {
    /// Allocate a fresh, random observer id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Explicit typed callback bound to one channel.
pub struct Handler<P> {
    callback: Arc<dyn Fn(&P) -> HandlerResult + Send + Sync>,
}

impl<P: 'static> Handler<P> {
    /// Handler receiving the broadcast payload.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&P) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Handler that ignores the payload.
    pub fn unit<F>(callback: F) -> Self
    where
        F: Fn() -> HandlerResult + Send + Sync + 'static,
    {
        Self::new(move |_: &P| callback())
    }
}

impl<P> Handler<P> {
    pub fn call(&self, payload: &P) -> HandlerResult {
        (self.callback)(payload)
    }
}

impl<P> Clone for Handler<P> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

/// Whether an observer object had a handler for a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Handled,
    Unhandled,
}

/// An object that handles several notifications of one channel type.
///
/// This is the typed replacement for binding a handler by method name: the
/// observer matches on the notification and returns `Resolution::Unhandled`
/// for identities it does not handle. An unhandled identity is only reported
/// when a broadcast reaches the observer, so an object may be bound before all
/// its handlers are written.
///
/// Handlers take `&self`; observers needing mutable state keep it behind
/// their own lock or atomics, since a handler may be re-entered by a nested
/// transition.
///
/// # Example
///
/// ```rust
/// use stagehand::notification::{HandlerResult, Observer, Resolution};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum PauseNotification { PauseEnter, PauseExit }
///
/// impl stagehand::core::Notification for PauseNotification {
///     fn name(&self) -> &str {
///         match self {
///             Self::PauseEnter => "PauseEnter",
///             Self::PauseExit => "PauseExit",
///         }
///     }
/// }
///
/// #[derive(Default)]
/// struct PausePanel { visible: AtomicBool }
///
/// impl Observer<PauseNotification, ()> for PausePanel {
///     fn on_notification(
///         &self,
///         notification: &PauseNotification,
///         _payload: &(),
///     ) -> Result<Resolution, stagehand::notification::BoxError> {
///         match notification {
///             PauseNotification::PauseEnter => self.visible.store(true, Ordering::SeqCst),
///             PauseNotification::PauseExit => self.visible.store(false, Ordering::SeqCst),
///         }
///         Ok(Resolution::Handled)
///     }
/// }
/// ```
pub trait Observer<N, P>: Send + Sync {
    fn on_notification(&self, notification: &N, payload: &P) -> Result<Resolution, BoxError>;
}

/// What a binding delivers to.
pub(crate) enum Target<N, P> {
    Callback(Handler<P>),
    Object(Weak<dyn Observer<N, P>>),
}

impl<N, P> Clone for Target<N, P> {
    fn clone(&self) -> Self {
        match self {
            Self::Callback(handler) => Self::Callback(handler.clone()),
            Self::Object(weak) => Self::Object(Weak::clone(weak)),
        }
    }
}

/// Association between one observer and one channel.
pub(crate) struct Binding<N, P> {
    pub(crate) observer: ObserverId,
    pub(crate) target: Target<N, P>,
}

impl<N, P> Clone for Binding<N, P> {
    fn clone(&self) -> Self {
        Self {
            observer: self.observer,
            target: self.target.clone(),
        }
    }
}

impl<N: Notification, P> Binding<N, P> {
    pub(crate) fn callback(observer: ObserverId, handler: Handler<P>) -> Self {
        Self {
            observer,
            target: Target::Callback(handler),
        }
    }

    pub(crate) fn object<O>(observer: ObserverId, object: &Arc<O>) -> Self
    where
        O: Observer<N, P> + 'static,
    {
        let strong: Arc<dyn Observer<N, P>> = object.clone();
        Self {
            observer,
            target: Target::Object(Arc::downgrade(&strong)),
        }
    }

    /// Resolve the binding and run its handler.
    pub(crate) fn deliver(&self, notification: &N, payload: &P) -> Result<(), DispatchFault> {
        let outcome = match &self.target {
            Target::Callback(handler) => handler.call(payload),
            Target::Object(weak) => {
                let Some(object) = weak.upgrade() else {
                    return Err(DispatchFault::ObserverDropped {
                        observer: self.observer,
                        notification: notification.name().to_string(),
                    });
                };
                match object.on_notification(notification, payload) {
                    Ok(Resolution::Handled) => Ok(()),
                    Ok(Resolution::Unhandled) => {
                        return Err(DispatchFault::UnresolvedHandler {
                            observer: self.observer,
                            notification: notification.name().to_string(),
                        })
                    }
                    Err(error) => Err(error),
                }
            }
        };

        outcome.map_err(|source| DispatchFault::ObserverFault {
            observer: self.observer,
            notification: notification.name().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestNotification {
        EndGameEnter,
        EndGameExit,
    }

    impl Notification for TestNotification {
        fn name(&self) -> &str {
            match self {
                Self::EndGameEnter => "EndGameEnter",
                Self::EndGameExit => "EndGameExit",
            }
        }
    }

    #[derive(Default)]
    struct EndGameMenu {
        shown: AtomicUsize,
    }

    impl Observer<TestNotification, ()> for EndGameMenu {
        fn on_notification(&self, notification: &TestNotification, _: &()) -> Result<Resolution, BoxError> {
            match notification {
                TestNotification::EndGameEnter => {
                    self.shown.fetch_add(1, Ordering::SeqCst);
                    Ok(Resolution::Handled)
                }
                _ => Ok(Resolution::Unhandled),
            }
        }
    }

    #[test]
    fn observer_ids_are_unique() {
        assert_ne!(ObserverId::new(), ObserverId::new());
    }

    #[test]
    fn callback_binding_passes_payload() {
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&seen);
        let binding: Binding<TestNotification, usize> = Binding::callback(
            ObserverId::new(),
            Handler::new(move |value: &usize| {
                sink.store(*value, Ordering::SeqCst);
                Ok(())
            }),
        );

        binding.deliver(&TestNotification::EndGameEnter, &7).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn unit_handler_ignores_payload() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&calls);
        let handler: Handler<String> = Handler::unit(move || {
            sink.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        handler.call(&"ignored".to_string()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_error_becomes_observer_fault() {
        let observer = ObserverId::new();
        let binding: Binding<TestNotification, ()> =
            Binding::callback(observer, Handler::unit(|| Err("menu panel missing".into())));

        let fault = binding.deliver(&TestNotification::EndGameEnter, &()).unwrap_err();
        assert!(matches!(fault, DispatchFault::ObserverFault { .. }));
        assert_eq!(fault.observer(), observer);
    }

    #[test]
    fn object_binding_resolves_handled_notification() {
        let menu = Arc::new(EndGameMenu::default());
        let binding = Binding::object(ObserverId::new(), &menu);

        binding.deliver(&TestNotification::EndGameEnter, &()).unwrap();
        assert_eq!(menu.shown.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn object_binding_reports_unresolved_handler() {
        let menu = Arc::new(EndGameMenu::default());
        let binding = Binding::object(ObserverId::new(), &menu);

        let fault = binding.deliver(&TestNotification::EndGameExit, &()).unwrap_err();
        assert!(matches!(fault, DispatchFault::UnresolvedHandler { .. }));
        assert_eq!(fault.notification(), "EndGameExit");
    }

    #[test]
    fn object_binding_does_not_keep_observer_alive() {
        let menu = Arc::new(EndGameMenu::default());
        let binding = Binding::object(ObserverId::new(), &menu);
        drop(menu);

        let fault = binding.deliver(&TestNotification::EndGameEnter, &()).unwrap_err();
        assert!(matches!(fault, DispatchFault::ObserverDropped { .. }));
    }
}
