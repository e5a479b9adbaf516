//! Registry facade tying the store, both resolvers and notifications together.

use std::sync::Arc;

use crate::claim::{ClaimOutcome, ClaimResolver};
use crate::error::Result;
use crate::notify::{DeliveryStatus, DispatchStatus, DownstreamNotifier, NotificationDispatcher};
use crate::record::{Claim, ContentRecord, Submission};
use crate::registration::{RegistrationOutcome, RegistrationResolver};
use crate::settings::RegistrySettings;
use crate::store::{Clock, FingerprintStore, SystemClock};

/// Result of [`Registry::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReport {
    pub outcome: RegistrationOutcome,
    /// Present only when a record was minted
    pub dispatch: Option<DispatchStatus>,
}

/// Content registry: one store shared by registration, claims and lookups.
///
/// # Example
///
/// ```
/// use imprint_core::{Registry, RegistrationOutcome, Submission};
///
/// let registry = Registry::builder().build();
/// let report = registry
///     .register(Submission::new("alice", "H1", "0000", "cat.png", "dev-1"))
///     .unwrap();
/// assert!(matches!(report.outcome, RegistrationOutcome::Minted { .. }));
/// ```
#[derive(Debug)]
pub struct Registry {
    store: Arc<FingerprintStore>,
    registration: RegistrationResolver,
    claims: ClaimResolver,
    dispatcher: NotificationDispatcher,
    settings: RegistrySettings,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Register a submission and, when it is minted, notify downstreams.
    ///
    /// Notification happens after the record is committed and never changes
    /// the outcome.
    pub fn register(&self, submission: Submission) -> Result<RegistrationReport> {
        let outcome = self.registration.register(submission)?;

        let dispatch = match &outcome {
            RegistrationOutcome::Minted { record } => Some(self.dispatcher.dispatch(record)),
            RegistrationOutcome::AlreadyRegistered { .. } => None,
        };

        Ok(RegistrationReport { outcome, dispatch })
    }

    pub fn resolve_claim(&self, claim: Claim) -> Result<ClaimOutcome> {
        self.claims.resolve_claim(claim)
    }

    /// Find the record registered with this exact hash.
    pub fn lookup(&self, exact_hash: &str) -> Option<ContentRecord> {
        self.store.find_by_exact_hash(exact_hash)
    }

    pub fn get(&self, id: u64) -> Option<ContentRecord> {
        self.store.get(id)
    }

    pub fn records_for_owner(&self, owner: &str) -> Vec<ContentRecord> {
        self.store.records_for_owner(owner)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Delivery results for a record, in arrival order.
    pub fn deliveries(&self, record_id: u64) -> Vec<DeliveryStatus> {
        self.dispatcher.log().get(record_id)
    }

    pub fn notifier_names(&self) -> Vec<String> {
        self.dispatcher.notifier_names()
    }

    pub fn settings(&self) -> RegistrySettings {
        self.settings
    }

    pub fn store(&self) -> &Arc<FingerprintStore> {
        &self.store
    }
}

/// Builder for [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    settings: RegistrySettings,
    clock: Option<Arc<dyn Clock>>,
    notifiers: Vec<Arc<dyn DownstreamNotifier>>,
}

impl RegistryBuilder {
    pub fn settings(mut self, settings: RegistrySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn similarity_threshold(mut self, threshold: u32) -> Self {
        self.settings.similarity_threshold = threshold;
        self
    }

    /// Use a custom timestamp source for committed records.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn DownstreamNotifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn notifiers(mut self, notifiers: impl IntoIterator<Item = Arc<dyn DownstreamNotifier>>) -> Self {
        self.notifiers.extend(notifiers);
        self
    }

    pub fn build(self) -> Registry {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let store = Arc::new(FingerprintStore::with_clock(clock));

        Registry {
            registration: RegistrationResolver::new(Arc::clone(&store), self.settings),
            claims: ClaimResolver::new(Arc::clone(&store), self.settings),
            dispatcher: NotificationDispatcher::new(self.notifiers),
            settings: self.settings,
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;

    #[test]
    fn test_duplicate_is_not_dispatched() {
        let registry = Registry::builder()
            .notifier(Arc::new(RecordingNotifier::new()))
            .build();

        let first = registry
            .register(Submission::new("alice", "H1", "0000", "a.png", "dev"))
            .unwrap();
        // No runtime in a plain #[test]
        assert_eq!(first.dispatch, Some(DispatchStatus::NoRuntime));

        let second = registry
            .register(Submission::new("bob", "H1", "0000", "a.png", "dev"))
            .unwrap();
        assert_eq!(second.dispatch, None);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_minted_record_reaches_notifier() {
        let recorder = Arc::new(RecordingNotifier::new());
        let registry = Registry::builder()
            .notifier(recorder.clone())
            .build();

        let report = registry
            .register(Submission::new("alice", "H1", "0000", "a.png", "dev"))
            .unwrap();
        assert_eq!(report.dispatch, Some(DispatchStatus::Scheduled { notifiers: 1 }));

        for _ in 0..100 {
            if !registry.deliveries(1).is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert_eq!(registry.deliveries(1).len(), 1);
        assert_eq!(recorder.events()[0].record_id, 1);
    }

    #[test]
    fn test_builder_threshold() {
        let registry = Registry::builder().similarity_threshold(3).build();
        assert_eq!(registry.settings().similarity_threshold, 3);
    }

    #[test]
    fn test_lookup_by_exact_hash() {
        let registry = Registry::default();
        registry
            .register(Submission::new("alice", "H1", "0000", "a.png", "dev"))
            .unwrap();

        assert_eq!(registry.lookup("H1").unwrap().id, 1);
        assert!(registry.lookup("H2").is_none());
    }
}
