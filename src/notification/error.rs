//! Dispatch faults and broadcast reports.

use super::binding::{BoxError, ObserverId};
use thiserror::Error;

/// A failure confined to a single observer during a broadcast.
///
/// Faults never abort a broadcast. They are logged as they happen and
/// collected in the [`DispatchReport`] returned to the poster.
#[derive(Debug, Error)]
pub enum DispatchFault {
    /// The observer object was reached but has no handler for the channel.
    #[error("observer {observer} has no handler for '{notification}'")]
    UnresolvedHandler {
        observer: ObserverId,
        notification: String,
    },

    /// The observer object was dropped without removing its binding.
    #[error("observer {observer} bound to '{notification}' was dropped while still registered")]
    ObserverDropped {
        observer: ObserverId,
        notification: String,
    },

    /// The handler returned an error.
    #[error("observer {observer} failed while handling '{notification}': {source}")]
    ObserverFault {
        observer: ObserverId,
        notification: String,
        #[source]
        source: BoxError,
    },

    /// The handler panicked.
    #[error("observer {observer} panicked while handling '{notification}': {message}")]
    ObserverPanicked {
        observer: ObserverId,
        notification: String,
        message: String,
    },
}

impl DispatchFault {
    /// Observer the fault is attributed to.
    pub fn observer(&self) -> ObserverId {
        match self {
            Self::UnresolvedHandler { observer, .. }
            | Self::ObserverDropped { observer, .. }
            | Self::ObserverFault { observer, .. }
            | Self::ObserverPanicked { observer, .. } => *observer,
        }
    }

    /// Channel the fault happened on.
    pub fn notification(&self) -> &str {
        match self {
            Self::UnresolvedHandler { notification, .. }
            | Self::ObserverDropped { notification, .. }
            | Self::ObserverFault { notification, .. }
            | Self::ObserverPanicked { notification, .. } => notification,
        }
    }
}

/// Outcome of one broadcast.
///
/// `delivered` counts bindings whose handler ran to completion. Every other
/// binding in the broadcast snapshot contributed exactly one fault.
#[derive(Debug, Default)]
pub struct DispatchReport {
    delivered: usize,
    faults: Vec<DispatchFault>,
}

impl DispatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_delivery(&mut self) {
        self.delivered += 1;
    }

    pub(crate) fn record_fault(&mut self, fault: DispatchFault) {
        self.faults.push(fault);
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: DispatchReport) {
        self.delivered += other.delivered;
        self.faults.extend(other.faults);
    }

    /// Number of handlers that completed successfully.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Number of bindings the broadcast reached, faulted or not.
    pub fn recipients(&self) -> usize {
        self.delivered + self.faults.len()
    }

    pub fn faults(&self) -> &[DispatchFault] {
        &self.faults
    }

    /// True when every reached handler completed.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_clean() {
        let report = DispatchReport::new();
        assert!(report.is_clean());
        assert_eq!(report.recipients(), 0);
    }

    #[test]
    fn recipients_counts_faults_and_deliveries() {
        let observer = ObserverId::new();
        let mut report = DispatchReport::new();
        report.record_delivery();
        report.record_fault(DispatchFault::UnresolvedHandler {
            observer,
            notification: "PauseEnter".to_string(),
        });

        assert_eq!(report.delivered(), 1);
        assert_eq!(report.recipients(), 2);
        assert!(!report.is_clean());
        assert_eq!(report.faults()[0].observer(), observer);
        assert_eq!(report.faults()[0].notification(), "PauseEnter");
    }

    #[test]
    fn merge_accumulates() {
        let mut first = DispatchReport::new();
        first.record_delivery();

        let mut second = DispatchReport::new();
        second.record_delivery();
        second.record_fault(DispatchFault::ObserverDropped {
            observer: ObserverId::new(),
            notification: "EndGameEnter".to_string(),
        });

        first.merge(second);
        assert_eq!(first.delivered(), 2);
        assert_eq!(first.faults().len(), 1);
    }

    #[test]
    fn fault_messages_name_the_channel() {
        let fault = DispatchFault::ObserverFault {
            observer: ObserverId::new(),
            notification: "CutSceneEnter".to_string(),
            source: "camera rig missing".into(),
        };
        let message = fault.to_string();
        assert!(message.contains("CutSceneEnter"));
        assert!(message.contains("camera rig missing"));
    }
}
