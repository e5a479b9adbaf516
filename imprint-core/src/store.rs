//! In-memory fingerprint store.
//!
//! Records live in an append-only log indexed by exact hash. All access goes
//! through a single `RwLock`:
//! - [`FingerprintStore::transaction`] takes the write lock, so a
//!   registration's duplicate checks and its commit form one atomic unit.
//! - [`FingerprintStore::snapshot`] takes the read lock, so claims and lookups
//!   never observe a half-committed record.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::error::{RegistryError, Result};
use crate::record::{ContentRecord, RecordStatus, SimilarityMatch, Submission};
use crate::similarity::hamming_distance;

/// Source of commit timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Default)]
struct StoreInner {
    records: Vec<ContentRecord>,
    by_exact_hash: HashMap<String, usize>,
}

impl StoreInner {
    fn find_by_exact_hash(&self, hash: &str) -> Option<&ContentRecord> {
        self.by_exact_hash
            .get(hash)
            .and_then(|&index| self.records.get(index))
    }

    fn find_within_threshold(&self, perceptual_hash: &str, threshold: u32) -> Vec<SimilarityMatch> {
        self.records
            .iter()
            .filter_map(|record| {
                // Length mismatch means "not comparable", never a match
                let distance = hamming_distance(&record.perceptual_hash, perceptual_hash).ok()?;
                (distance <= threshold).then(|| SimilarityMatch {
                    record: record.clone(),
                    distance,
                })
            })
            .collect()
    }

    fn get(&self, id: u64) -> Option<&ContentRecord> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.records.get(index)
    }
}

/// Thread-safe registry of committed content records.
pub struct FingerprintStore {
    inner: RwLock<StoreInner>,
    clock: Arc<dyn Clock>,
}

impl Default for FingerprintStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintStore {
    /// Create an empty store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store with a custom timestamp source.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            clock,
        }
    }

    /// Open a read-only view. Holds the read lock until dropped.
    pub fn snapshot(&self) -> StoreSnapshot<'_> {
        // Records are appended in a single push, so a poisoned lock still
        // guards a consistent log.
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        StoreSnapshot { guard }
    }

    /// Open an exclusive check-then-commit section. Holds the write lock
    /// until dropped.
    pub fn transaction(&self) -> StoreTransaction<'_> {
        let guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        StoreTransaction {
            guard,
            clock: self.clock.as_ref(),
        }
    }

    /// Look up the record with this exact hash.
    pub fn find_by_exact_hash(&self, hash: &str) -> Option<ContentRecord> {
        self.snapshot().find_by_exact_hash(hash)
    }

    /// Every record within `threshold` bits of `perceptual_hash`, unordered.
    pub fn find_within_threshold(
        &self,
        perceptual_hash: &str,
        threshold: u32,
    ) -> Vec<SimilarityMatch> {
        self.snapshot()
            .find_within_threshold(perceptual_hash, threshold)
    }

    /// Append a record without the perceptual check.
    ///
    /// Registration goes through [`StoreTransaction::commit`] instead; this
    /// is for seeding and tests. Exact-hash uniqueness still holds.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateExactHash`] if the exact hash is
    /// already on record.
    pub fn commit(&self, submission: Submission) -> Result<ContentRecord> {
        self.transaction().commit(submission)
    }

    /// Look up a record by id.
    pub fn get(&self, id: u64) -> Option<ContentRecord> {
        self.snapshot().get(id)
    }

    /// All records registered by `owner`, in commit order.
    pub fn records_for_owner(&self, owner: &str) -> Vec<ContentRecord> {
        self.snapshot().records_for_owner(owner)
    }

    /// Number of committed records.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for FingerprintStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FingerprintStore")
            .field("records", &self.len())
            .finish()
    }
}

/// Consistent read-only view of the store.
pub struct StoreSnapshot<'a> {
    guard: RwLockReadGuard<'a, StoreInner>,
}

impl StoreSnapshot<'_> {
    pub fn find_by_exact_hash(&self, hash: &str) -> Option<ContentRecord> {
        self.guard.find_by_exact_hash(hash).cloned()
    }

    pub fn find_within_threshold(
        &self,
        perceptual_hash: &str,
        threshold: u32,
    ) -> Vec<SimilarityMatch> {
        self.guard.find_within_threshold(perceptual_hash, threshold)
    }

    pub fn get(&self, id: u64) -> Option<ContentRecord> {
        self.guard.get(id).cloned()
    }

    pub fn records_for_owner(&self, owner: &str) -> Vec<ContentRecord> {
        self.guard
            .records
            .iter()
            .filter(|record| record.owner == owner)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.guard.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.records.is_empty()
    }
}

/// Exclusive section over the store: lookups and at most one commit per
/// registration happen while the write lock is held.
pub struct StoreTransaction<'a> {
    guard: RwLockWriteGuard<'a, StoreInner>,
    clock: &'a dyn Clock,
}

impl StoreTransaction<'_> {
    pub fn find_by_exact_hash(&self, hash: &str) -> Option<ContentRecord> {
        self.guard.find_by_exact_hash(hash).cloned()
    }

    pub fn find_within_threshold(
        &self,
        perceptual_hash: &str,
        threshold: u32,
    ) -> Vec<SimilarityMatch> {
        self.guard.find_within_threshold(perceptual_hash, threshold)
    }

    /// Assign the next id and commit timestamp, then append the record.
    ///
    /// The timestamp never goes backwards relative to the previous record,
    /// even if the clock does.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateExactHash`] if a record with the same
    /// exact hash exists; the store is left unchanged.
    pub fn commit(&mut self, submission: Submission) -> Result<ContentRecord> {
        let inner = &mut *self.guard;

        if let Some(existing) = inner.find_by_exact_hash(&submission.exact_hash) {
            return Err(RegistryError::DuplicateExactHash {
                exact_hash: submission.exact_hash,
                existing_id: existing.id,
            });
        }

        let id = inner.records.len() as u64 + 1;
        let now = self.clock.now();
        let created_at = match inner.records.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };

        let record = ContentRecord {
            id,
            owner: submission.owner,
            exact_hash: submission.exact_hash,
            perceptual_hash: submission.perceptual_hash,
            file_name: submission.file_name,
            device_fingerprint: submission.device_fingerprint,
            status: RecordStatus::Approved,
            created_at,
        };

        inner
            .by_exact_hash
            .insert(record.exact_hash.clone(), inner.records.len());
        inner.records.push(record.clone());

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// Clock that replays a fixed list of instants, repeating the last one.
    struct ScriptedClock(Mutex<Vec<DateTime<Utc>>>);

    impl Clock for ScriptedClock {
        fn now(&self) -> DateTime<Utc> {
            let mut times = self.0.lock().unwrap();
            if times.len() > 1 {
                times.remove(0)
            } else {
                times[0]
            }
        }
    }

    fn submission(owner: &str, exact: &str, perceptual: &str) -> Submission {
        Submission::new(owner, exact, perceptual, "file.png", "device")
    }

    #[test]
    fn test_commit_assigns_sequential_ids() {
        let store = FingerprintStore::new();
        let first = store.commit(submission("alice", "H1", "0000")).unwrap();
        let second = store.commit(submission("bob", "H2", "1111")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.status, RecordStatus::Approved);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_find_by_exact_hash() {
        let store = FingerprintStore::new();
        store.commit(submission("alice", "H1", "0000")).unwrap();

        assert_eq!(store.find_by_exact_hash("H1").unwrap().owner, "alice");
        assert!(store.find_by_exact_hash("H2").is_none());
    }

    #[test]
    fn test_find_within_threshold_boundary() {
        let store = FingerprintStore::new();
        store.commit(submission("alice", "H1", "0000000000000000")).unwrap();

        let two_off = "1100000000000000";
        let three_off = "1110000000000000";

        assert_eq!(store.find_within_threshold(two_off, 2).len(), 1);
        assert!(store.find_within_threshold(three_off, 2).is_empty());
    }

    #[test]
    fn test_find_within_threshold_skips_incomparable() {
        let store = FingerprintStore::new();
        store.commit(submission("alice", "H1", "0000")).unwrap();

        assert!(store.find_within_threshold("00000", 100).is_empty());
    }

    #[test]
    fn test_created_at_never_goes_backwards() {
        let later = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let clock = ScriptedClock(Mutex::new(vec![later, earlier]));
        let store = FingerprintStore::with_clock(Arc::new(clock));

        let first = store.commit(submission("alice", "H1", "0000")).unwrap();
        let second = store.commit(submission("bob", "H2", "1111")).unwrap();

        assert_eq!(first.created_at, later);
        assert_eq!(second.created_at, later);
    }

    #[test]
    fn test_get_and_owner_listing() {
        let store = FingerprintStore::new();
        store.commit(submission("alice", "H1", "0000")).unwrap();
        store.commit(submission("bob", "H2", "1111")).unwrap();
        store.commit(submission("alice", "H3", "0101")).unwrap();

        assert_eq!(store.get(2).unwrap().owner, "bob");
        assert!(store.get(0).is_none());
        assert!(store.get(4).is_none());

        let ids: Vec<u64> = store
            .records_for_owner("alice")
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_commit_rejects_existing_exact_hash() {
        let store = FingerprintStore::new();
        store.commit(submission("alice", "H1", "0000")).unwrap();

        let err = store
            .commit(submission("mallory", "H1", "1111"))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateExactHash {
                exact_hash: "H1".into(),
                existing_id: 1,
            }
        );

        // The first registrant keeps the hash
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_exact_hash("H1").unwrap().owner, "alice");

        // Ids stay dense after a rejected commit
        let next = store.commit(submission("bob", "H2", "0101")).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_transaction_commit_rejects_existing_exact_hash() {
        let store = FingerprintStore::new();
        let mut txn = store.transaction();
        txn.commit(submission("alice", "H1", "0000")).unwrap();
        assert!(txn.commit(submission("mallory", "H1", "0000")).is_err());
        drop(txn);

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_store() {
        let store = FingerprintStore::default();
        assert!(store.is_empty());
        assert!(store.snapshot().is_empty());
    }
}
