//! Recording notifier for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{DownstreamNotifier, MintedEvent, NotificationReceipt};
use crate::error::{RegistryError, Result};

/// Notifier that keeps every event it receives in memory.
///
/// WARNING: test helper only; events are never forwarded anywhere.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<MintedEvent>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that records the event and then reports a failure.
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.set_failing(true);
        notifier
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Events received so far.
    pub fn events(&self) -> Vec<MintedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DownstreamNotifier for RecordingNotifier {
    async fn notify(&self, event: &MintedEvent) -> Result<NotificationReceipt> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());

        if self.fail.load(Ordering::SeqCst) {
            return Err(RegistryError::Notification(
                "recording notifier set to fail".into(),
            ));
        }

        Ok(NotificationReceipt {
            notifier: self.name().to_string(),
            network: "memory".to_string(),
            reference: event.event_id.to_string(),
            secondary_reference: None,
            message: "Event recorded.".to_string(),
        })
    }

    fn name(&self) -> &str {
        "recording"
    }
}
