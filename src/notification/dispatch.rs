//! Binding registry shared by `NotificationCenter` and `Messenger`.
//!
//! Architecture:
//!   add/remove ──→ Mutex<HashMap<N, Vec<Binding>>>
//!                          │ snapshot (lock held)
//!                          ↓
//!   dispatch ──→ Vec<Binding> (lock released) ──→ handlers, in order
//!
//! The lock is never held while a handler runs, so handlers may add or remove
//! bindings, post further notifications, or request transitions. Changes made
//! during a broadcast only affect later broadcasts.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use log::{error, trace, warn};
use parking_lot::{Mutex, MutexGuard};

use super::binding::{Binding, ObserverId};
use super::error::{DispatchFault, DispatchReport};
use crate::core::Notification;

pub(crate) struct Registry<N, P> {
    bindings: Mutex<HashMap<N, Vec<Binding<N, P>>>>,
}

impl<N: Notification, P: 'static> Registry<N, P> {
    pub(crate) fn new() -> Self {
        Self {
            bindings: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<N, Vec<Binding<N, P>>>> {
        self.bindings.lock()
    }

    //--- Registration -----------------------------------------------------

    /// Appends a binding; insertion order is dispatch order.
    pub(crate) fn add(&self, notification: N, binding: Binding<N, P>) {
        trace!(
            "Binding observer {} to '{}'",
            binding.observer,
            notification.name()
        );
        self.lock().entry(notification).or_default().push(binding);
    }

    /// Removes every binding `observer` holds on `notification`.
    pub(crate) fn remove(&self, observer: ObserverId, notification: &N) -> bool {
        let mut bindings = self.lock();
        let Some(list) = bindings.get_mut(notification) else {
            return false;
        };

        let before = list.len();
        list.retain(|binding| binding.observer != observer);
        let removed = list.len() != before;

        if list.is_empty() {
            bindings.remove(notification);
        }
        removed
    }

    /// Removes every binding held by `observer`, returning how many went.
    pub(crate) fn remove_all(&self, observer: ObserverId) -> usize {
        let mut bindings = self.lock();
        let mut removed = 0;
        for list in bindings.values_mut() {
            let before = list.len();
            list.retain(|binding| binding.observer != observer);
            removed += before - list.len();
        }
        bindings.retain(|_, list| !list.is_empty());
        removed
    }

    pub(crate) fn clear(&self) {
        self.lock().clear();
    }

    //--- Queries ----------------------------------------------------------

    pub(crate) fn count(&self, notification: &N) -> usize {
        self.lock().get(notification).map_or(0, Vec::len)
    }

    pub(crate) fn contains(&self, observer: ObserverId, notification: &N) -> bool {
        self.lock()
            .get(notification)
            .is_some_and(|list| list.iter().any(|binding| binding.observer == observer))
    }

    pub(crate) fn total(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    //--- Dispatch ---------------------------------------------------------

    fn snapshot(&self, notification: &N) -> Vec<Binding<N, P>> {
        self.lock().get(notification).cloned().unwrap_or_default()
    }

    /// Delivers `payload` to a snapshot of the bindings on `notification`.
    ///
    /// Each handler runs in isolation: an error, a panic, or an unresolved
    /// handler is logged and recorded, and the next binding still runs.
    pub(crate) fn dispatch(&self, notification: &N, payload: &P) -> DispatchReport {
        let snapshot = self.snapshot(notification);
        let mut report = DispatchReport::new();

        trace!(
            "Posting '{}' to {} observer(s)",
            notification.name(),
            snapshot.len()
        );

        for binding in &snapshot {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                binding.deliver(notification, payload)
            }));

            match result {
                Ok(Ok(())) => report.record_delivery(),
                Ok(Err(fault)) => {
                    log_fault(&fault);
                    report.record_fault(fault);
                }
                Err(panic) => {
                    let fault = DispatchFault::ObserverPanicked {
                        observer: binding.observer,
                        notification: notification.name().to_string(),
                        message: panic_message(panic.as_ref()),
                    };
                    log_fault(&fault);
                    report.record_fault(fault);
                }
            }
        }

        report
    }
}

fn log_fault(fault: &DispatchFault) {
    match fault {
        DispatchFault::UnresolvedHandler { .. } | DispatchFault::ObserverDropped { .. } => {
            warn!("{}", fault)
        }
        DispatchFault::ObserverFault { .. } | DispatchFault::ObserverPanicked { .. } => {
            error!("{}", fault)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

//=========================================================================
// Tests
//=========================================================================
