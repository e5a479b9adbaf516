use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{require_fields, Result};

/// Lifecycle state of a registered work.
///
/// Every record is `Approved` at commit. The enum is non-exhaustive so that
/// dispute or revocation states can be added without breaking matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum RecordStatus {
    Approved,
}

/// A registered work. Immutable once committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Commit-order identifier, starting at 1
    pub id: u64,
    /// Registrant identifier
    pub owner: String,
    /// Cryptographic digest of the original bytes (hex)
    pub exact_hash: String,
    /// Perceptual signature (bit string)
    pub perceptual_hash: String,
    /// Display label, never used for matching
    pub file_name: String,
    /// Audit-only device identifier
    pub device_fingerprint: String,
    pub status: RecordStatus,
    /// Commit time, the priority tie-break
    pub created_at: DateTime<Utc>,
}

/// A registration request before the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub owner: String,
    pub exact_hash: String,
    pub perceptual_hash: String,
    pub file_name: String,
    pub device_fingerprint: String,
}

impl Submission {
    pub fn new(
        owner: impl Into<String>,
        exact_hash: impl Into<String>,
        perceptual_hash: impl Into<String>,
        file_name: impl Into<String>,
        device_fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            exact_hash: exact_hash.into(),
            perceptual_hash: perceptual_hash.into(),
            file_name: file_name.into(),
            device_fingerprint: device_fingerprint.into(),
        }
    }

    /// Check that every field is non-empty.
    pub fn validate(&self) -> Result<()> {
        require_fields(&[
            ("owner", &self.owner),
            ("exactHash", &self.exact_hash),
            ("perceptualHash", &self.perceptual_hash),
            ("fileName", &self.file_name),
            ("deviceFingerprint", &self.device_fingerprint),
        ])
    }
}

/// A dispute over who registered a work first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub claimant: String,
    pub exact_hash: String,
    pub perceptual_hash: String,
    pub file_name: String,
    /// Free-form category supplied by the claimant (e.g. "copyright")
    #[serde(default)]
    pub claim_type: Option<String>,
    /// Number of supporting documents the claimant says they hold
    #[serde(default)]
    pub evidence_count: Option<u32>,
}

impl Claim {
    pub fn new(
        claimant: impl Into<String>,
        exact_hash: impl Into<String>,
        perceptual_hash: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            claimant: claimant.into(),
            exact_hash: exact_hash.into(),
            perceptual_hash: perceptual_hash.into(),
            file_name: file_name.into(),
            claim_type: None,
            evidence_count: None,
        }
    }

    pub fn with_claim_type(mut self, claim_type: impl Into<String>) -> Self {
        self.claim_type = Some(claim_type.into());
        self
    }

    pub fn with_evidence_count(mut self, count: u32) -> Self {
        self.evidence_count = Some(count);
        self
    }

    /// Check that the four identifying fields are non-empty.
    pub fn validate(&self) -> Result<()> {
        require_fields(&[
            ("claimant", &self.claimant),
            ("exactHash", &self.exact_hash),
            ("perceptualHash", &self.perceptual_hash),
            ("fileName", &self.file_name),
        ])
    }
}

/// A record found by a perceptual lookup, with its distance from the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityMatch {
    pub record: ContentRecord,
    /// Hamming distance from the query hash (0 = identical signature)
    pub distance: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;

    #[test]
    fn test_submission_validate_ok() {
        let submission = Submission::new("alice", "H1", "P1", "cat.png", "dev-1");
        assert!(submission.validate().is_ok());
    }

    #[test]
    fn test_submission_validate_lists_missing() {
        let submission = Submission::new("", "H1", "", "cat.png", "dev-1");
        assert_eq!(
            submission.validate(),
            Err(RegistryError::missing(["owner", "perceptualHash"]))
        );
    }

    #[test]
    fn test_claim_optional_fields_not_required() {
        let claim = Claim::new("carl", "H9", "P9", "dog.png");
        assert!(claim.validate().is_ok());
        assert!(claim.claim_type.is_none());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = ContentRecord {
            id: 1,
            owner: "alice".into(),
            exact_hash: "H1".into(),
            perceptual_hash: "P1".into(),
            file_name: "cat.png".into(),
            device_fingerprint: "dev-1".into(),
            status: RecordStatus::Approved,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["exactHash"], "H1");
        assert_eq!(json["status"], "approved");
    }
}
