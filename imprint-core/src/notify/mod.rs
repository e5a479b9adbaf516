//! Downstream notifications for newly registered works.
//!
//! Once a record is committed, the registry tells external systems about it:
//! ledger anchoring, token minting, ownership proofs, payment channels. These
//! calls are fire-and-forget. A failed or slow notifier never blocks the
//! registration that triggered it and never rolls it back; its result only
//! lands in the [`DeliveryLog`].
//!
//! ## Notifiers
//!
//! - [`SimulatedLedger`] - deterministic stand-ins for the four ledger services
//! - [`WebhookNotifier`] - POSTs the event as JSON, with retry (`network` feature)
//! - [`RecordingNotifier`] - in-memory recorder for tests

mod dispatcher;
mod mock;
mod simulated;
#[cfg(feature = "network")]
mod webhook;

pub use dispatcher::{DispatchStatus, NotificationDispatcher};
pub use mock::RecordingNotifier;
pub use simulated::{LedgerKind, SimulatedLedger};
#[cfg(feature = "network")]
pub use webhook::{WebhookConfig, WebhookNotifier};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::record::ContentRecord;

/// Trait for systems that want to hear about new registrations.
///
/// Implementations must be thread-safe (`Send + Sync`) and handle their own
/// retries; the dispatcher calls each notifier once per event.
#[async_trait]
pub trait DownstreamNotifier: Send + Sync {
    /// Deliver one event.
    async fn notify(&self, event: &MintedEvent) -> Result<NotificationReceipt>;

    /// Stable identifier used in logs and the delivery log.
    fn name(&self) -> &str;
}

/// Payload sent to notifiers after a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintedEvent {
    /// Unique per event, usable as an idempotency key by receivers
    pub event_id: Uuid,
    pub record_id: u64,
    pub owner: String,
    pub exact_hash: String,
    pub perceptual_hash: String,
    pub file_name: String,
    pub registered_at: DateTime<Utc>,
}

impl MintedEvent {
    pub fn from_record(record: &ContentRecord) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            record_id: record.id,
            owner: record.owner.clone(),
            exact_hash: record.exact_hash.clone(),
            perceptual_hash: record.perceptual_hash.clone(),
            file_name: record.file_name.clone(),
            registered_at: record.created_at,
        }
    }
}

/// What a notifier reports back after a successful delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationReceipt {
    pub notifier: String,
    /// Target network or endpoint
    pub network: String,
    /// Primary reference (transaction hash, token id, proof id...)
    pub reference: String,
    /// Secondary reference when the target returns two identifiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_reference: Option<String>,
    pub message: String,
}

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatus {
    pub notifier: String,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<NotificationReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

impl DeliveryStatus {
    pub fn delivered(receipt: NotificationReceipt) -> Self {
        Self {
            notifier: receipt.notifier.clone(),
            delivered: true,
            receipt: Some(receipt),
            error: None,
            attempted_at: Utc::now(),
        }
    }

    pub fn failed(notifier: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            notifier: notifier.into(),
            delivered: false,
            receipt: None,
            error: Some(error.into()),
            attempted_at: Utc::now(),
        }
    }
}

/// Per-record history of notifier deliveries.
#[derive(Default)]
pub struct DeliveryLog {
    entries: DashMap<u64, Vec<DeliveryStatus>>,
}

impl DeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delivery result for a record.
    pub fn record(&self, record_id: u64, status: DeliveryStatus) {
        self.entries.entry(record_id).or_default().push(status);
    }

    /// Every delivery result for a record, in arrival order.
    pub fn get(&self, record_id: u64) -> Vec<DeliveryStatus> {
        self.entries
            .get(&record_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Number of records with at least one delivery result.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for DeliveryLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryLog")
            .field("records", &self.entries.len())
            .finish()
    }
}

/// First `n` characters of `s`, or all of it if shorter.
pub(crate) fn prefix(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(index, _)| &s[..index])
}
