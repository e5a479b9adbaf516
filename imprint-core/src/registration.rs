//! Duplicate detection on registration.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::record::{ContentRecord, Submission};
use crate::settings::RegistrySettings;
use crate::store::FingerprintStore;

/// Which check found the prior registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Byte-identical content (same exact hash)
    Exact,
    /// Visually similar content (perceptual hash within threshold)
    Perceptual,
}

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// New content; the record was committed.
    Minted { record: ContentRecord },
    /// The content, or a near-duplicate of it, is already registered.
    ///
    /// Near-duplicates are reported exactly like exact duplicates and block
    /// registration; `kind` only says which check matched.
    AlreadyRegistered {
        matched: ContentRecord,
        kind: MatchKind,
        /// Hamming distance, present for perceptual matches
        distance: Option<u32>,
    },
}

impl RegistrationOutcome {
    pub fn is_minted(&self) -> bool {
        matches!(self, Self::Minted { .. })
    }

    /// Human-readable summary of the outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Minted { .. } => "Fingerprint is unique. Ready to mint & anchor.".to_string(),
            Self::AlreadyRegistered {
                matched,
                kind: MatchKind::Exact,
                ..
            } => format!(
                "Content already registered to {} (exact fingerprint match).",
                matched.owner
            ),
            Self::AlreadyRegistered {
                kind: MatchKind::Perceptual,
                ..
            } => "A visually similar fingerprint is already registered (perceptual hash match)."
                .to_string(),
        }
    }

    /// The record the outcome refers to: the new one, or the prior match.
    pub fn record(&self) -> &ContentRecord {
        match self {
            Self::Minted { record } => record,
            Self::AlreadyRegistered { matched, .. } => matched,
        }
    }
}

/// Decides whether a submission is new, and commits it if so.
#[derive(Debug, Clone)]
pub struct RegistrationResolver {
    store: Arc<FingerprintStore>,
    settings: RegistrySettings,
}

impl RegistrationResolver {
    pub fn new(store: Arc<FingerprintStore>, settings: RegistrySettings) -> Self {
        Self { store, settings }
    }

    /// Register a submission.
    ///
    /// The exact check, the similarity check and the commit all run under the
    /// store's write lock, so two concurrent submissions of the same content
    /// cannot both be minted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Validation`] if any field is empty; the
    /// store is not touched in that case.
    #[instrument(skip_all, fields(owner = %submission.owner, file_name = %submission.file_name))]
    pub fn register(&self, submission: Submission) -> Result<RegistrationOutcome> {
        submission.validate()?;

        let mut txn = self.store.transaction();

        if let Some(existing) = txn.find_by_exact_hash(&submission.exact_hash) {
            info!(
                record_id = existing.id,
                existing_owner = %existing.owner,
                "Exact fingerprint already registered"
            );
            return Ok(RegistrationOutcome::AlreadyRegistered {
                matched: existing,
                kind: MatchKind::Exact,
                distance: None,
            });
        }

        let closest = txn
            .find_within_threshold(
                &submission.perceptual_hash,
                self.settings.similarity_threshold,
            )
            .into_iter()
            .min_by_key(|m| (m.distance, m.record.id));

        if let Some(similar) = closest {
            info!(
                record_id = similar.record.id,
                existing_owner = %similar.record.owner,
                distance = similar.distance,
                "Similar fingerprint already registered"
            );
            return Ok(RegistrationOutcome::AlreadyRegistered {
                matched: similar.record,
                kind: MatchKind::Perceptual,
                distance: Some(similar.distance),
            });
        }

        let record = txn.commit(submission)?;
        drop(txn);

        debug!(record_id = record.id, "Record committed");
        info!(record_id = record.id, "Fingerprint registered");

        Ok(RegistrationOutcome::Minted { record })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;

    fn resolver() -> (Arc<FingerprintStore>, RegistrationResolver) {
        let store = Arc::new(FingerprintStore::new());
        let resolver = RegistrationResolver::new(store.clone(), RegistrySettings::default());
        (store, resolver)
    }

    fn bits(ones: usize) -> String {
        format!("{}{}", "1".repeat(ones), "0".repeat(64 - ones))
    }

    #[test]
    fn test_register_new_content_is_minted() {
        let (store, resolver) = resolver();
        let outcome = resolver
            .register(Submission::new("alice", "H1", bits(0), "a.png", "dev"))
            .unwrap();

        assert!(outcome.is_minted());
        assert_eq!(outcome.record().id, 1);
        assert_eq!(outcome.message(), "Fingerprint is unique. Ready to mint & anchor.");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_register_exact_duplicate() {
        let (store, resolver) = resolver();
        resolver
            .register(Submission::new("alice", "H1", bits(0), "a.png", "dev"))
            .unwrap();

        // Same exact hash, unrelated perceptual hash
        let outcome = resolver
            .register(Submission::new("bob", "H1", bits(40), "b.png", "dev"))
            .unwrap();

        match outcome {
            RegistrationOutcome::AlreadyRegistered {
                matched,
                kind,
                distance,
            } => {
                assert_eq!(matched.owner, "alice");
                assert_eq!(kind, MatchKind::Exact);
                assert_eq!(distance, None);
            }
            other => panic!("expected AlreadyRegistered, got {other:?}"),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_exact_duplicate_message_names_owner() {
        let (_, resolver) = resolver();
        resolver
            .register(Submission::new("alice", "H1", bits(0), "a.png", "dev"))
            .unwrap();
        let outcome = resolver
            .register(Submission::new("bob", "H1", bits(0), "b.png", "dev"))
            .unwrap();
        assert_eq!(
            outcome.message(),
            "Content already registered to alice (exact fingerprint match)."
        );
    }

    #[test]
    fn test_register_near_duplicate_picks_closest_then_earliest() {
        let (_, resolver) = resolver();
        resolver
            .register(Submission::new("alice", "H1", bits(0), "a.png", "dev"))
            .unwrap();
        // 20 bits from alice, so it is minted on its own
        resolver
            .register(Submission::new("bob", "H2", bits(20), "b.png", "dev"))
            .unwrap();

        // 8 bits from alice, 12 from bob
        let outcome = resolver
            .register(Submission::new("carl", "H3", bits(8), "c.png", "dev"))
            .unwrap();

        match outcome {
            RegistrationOutcome::AlreadyRegistered {
                matched,
                kind,
                distance,
            } => {
                assert_eq!(matched.id, 1);
                assert_eq!(kind, MatchKind::Perceptual);
                assert_eq!(distance, Some(8));
            }
            other => panic!("expected AlreadyRegistered, got {other:?}"),
        }
    }

    #[test]
    fn test_register_respects_configured_threshold() {
        let store = Arc::new(FingerprintStore::new());
        let strict = RegistrationResolver::new(
            store,
            RegistrySettings {
                similarity_threshold: 2,
            },
        );
        strict
            .register(Submission::new("alice", "H1", bits(0), "a.png", "dev"))
            .unwrap();

        let outcome = strict
            .register(Submission::new("bob", "H2", bits(3), "b.png", "dev"))
            .unwrap();
        assert!(outcome.is_minted());
    }

    #[test]
    fn test_register_validation_does_not_touch_store() {
        let (store, resolver) = resolver();
        let err = resolver
            .register(Submission::new("alice", "", bits(0), "a.png", ""))
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::missing(["exactHash", "deviceFingerprint"])
        );
        assert!(store.is_empty());
    }
}
