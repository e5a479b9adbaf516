//! Fire-and-forget fan-out of minted events.

use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, info, warn, Instrument};

use super::{DeliveryLog, DeliveryStatus, DownstreamNotifier, MintedEvent};
use crate::record::ContentRecord;

/// What happened when a minted record was handed to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum DispatchStatus {
    /// One background task per notifier was spawned.
    Scheduled { notifiers: usize },
    /// No notifiers are configured.
    Disabled,
    /// Called outside a tokio runtime; nothing was sent.
    NoRuntime,
}

/// Sends minted events to every configured notifier.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifiers: Vec<Arc<dyn DownstreamNotifier>>,
    log: Arc<DeliveryLog>,
}

impl NotificationDispatcher {
    pub fn new(notifiers: Vec<Arc<dyn DownstreamNotifier>>) -> Self {
        Self {
            notifiers,
            log: Arc::new(DeliveryLog::new()),
        }
    }

    /// Dispatcher with no notifiers; every dispatch is [`DispatchStatus::Disabled`].
    pub fn disabled() -> Self {
        Self::new(Vec::new())
    }

    pub fn log(&self) -> &Arc<DeliveryLog> {
        &self.log
    }

    pub fn notifier_names(&self) -> Vec<String> {
        self.notifiers.iter().map(|n| n.name().to_string()).collect()
    }

    /// Schedule delivery of a freshly committed record and return at once.
    ///
    /// Delivery results are written to the [`DeliveryLog`] as they arrive.
    pub fn dispatch(&self, record: &ContentRecord) -> DispatchStatus {
        if self.notifiers.is_empty() {
            return DispatchStatus::Disabled;
        }

        let Ok(handle) = Handle::try_current() else {
            warn!(
                record_id = record.id,
                "No async runtime available, skipping downstream notifications"
            );
            return DispatchStatus::NoRuntime;
        };

        let event = Arc::new(MintedEvent::from_record(record));
        for notifier in &self.notifiers {
            let notifier = Arc::clone(notifier);
            let event = Arc::clone(&event);
            let log = Arc::clone(&self.log);
            let span = tracing::info_span!(
                "notify",
                notifier = notifier.name(),
                record_id = event.record_id
            );
            handle.spawn(
                async move {
                    let status = deliver_one(notifier.as_ref(), &event).await;
                    log.record(event.record_id, status);
                }
                .instrument(span),
            );
        }

        debug!(
            record_id = record.id,
            notifiers = self.notifiers.len(),
            "Downstream notifications scheduled"
        );

        DispatchStatus::Scheduled {
            notifiers: self.notifiers.len(),
        }
    }

    /// Deliver an event to every notifier in order and wait for the results.
    ///
    /// Results are also written to the delivery log.
    pub async fn deliver(&self, event: &MintedEvent) -> Vec<DeliveryStatus> {
        let mut statuses = Vec::with_capacity(self.notifiers.len());
        for notifier in &self.notifiers {
            let status = deliver_one(notifier.as_ref(), event).await;
            self.log.record(event.record_id, status.clone());
            statuses.push(status);
        }
        statuses
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("notifiers", &self.notifier_names())
            .finish()
    }
}

async fn deliver_one(notifier: &dyn DownstreamNotifier, event: &MintedEvent) -> DeliveryStatus {
    match notifier.notify(event).await {
        Ok(receipt) => {
            info!(reference = %receipt.reference, "Downstream notified");
            DeliveryStatus::delivered(receipt)
        }
        Err(e) => {
            warn!(error = %e, "Downstream notification failed");
            DeliveryStatus::failed(notifier.name(), e.to_string())
        }
    }
}
