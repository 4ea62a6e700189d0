//! String-keyed messenger for ad-hoc events.

use super::binding::{Binding, Handler, HandlerResult, ObserverId};
use super::dispatch::Registry;
use super::error::DispatchReport;

/// Lightweight pub/sub keyed by flat string identities.
///
/// Used where emitter and receiver are not tied to a formal state machine:
/// button clicks, drag-and-drop placement, trigger volumes. Every listener of
/// one messenger receives the same payload type `P`, so events carrying
/// different payloads live on different messengers.
///
/// Ordering, fault isolation and snapshot dispatch behave exactly as in
/// [`NotificationCenter`](super::NotificationCenter). Only explicit callbacks
/// can be registered.
pub struct Messenger<P = ()> {
    registry: Registry<String, P>,
}

impl<P: 'static> Messenger<P> {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Registers `handler` for `key` on behalf of `owner`.
    pub fn add_listener<F>(&self, owner: ObserverId, key: impl Into<String>, handler: F)
    where
        F: Fn(&P) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry
            .add(key.into(), Binding::callback(owner, Handler::new(handler)));
    }

    /// Registers a listener that ignores the payload.
    pub fn add_listener_unit<F>(&self, owner: ObserverId, key: impl Into<String>, handler: F)
    where
        F: Fn() -> HandlerResult + Send + Sync + 'static,
    {
        self.registry
            .add(key.into(), Binding::callback(owner, Handler::unit(handler)));
    }

    /// Removes `owner`'s listeners on `key`. No-op when absent.
    pub fn remove_listener(&self, owner: ObserverId, key: &str) -> bool {
        self.registry.remove(owner, &key.to_owned())
    }

    pub fn remove_all(&self, owner: ObserverId) -> usize {
        self.registry.remove_all(owner)
    }

    pub fn clear(&self) {
        self.registry.clear();
    }

    /// Delivers `payload` to every listener of `key`.
    pub fn invoke(&self, key: &str, payload: &P) -> DispatchReport {
        self.registry.dispatch(&key.to_owned(), payload)
    }

    pub fn listener_count(&self, key: &str) -> usize {
        self.registry.count(&key.to_owned())
    }
}

impl Messenger<()> {
    /// Invokes a key whose listeners take no payload.
    pub fn broadcast(&self, key: &str) -> DispatchReport {
        self.invoke(key, &())
    }
}

impl<P: 'static> Default for Messenger<P> {
    fn default() -> Self {
        Self::new()
    }
}
