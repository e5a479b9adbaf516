//! Priority resolution for disputed content.
//!
//! A claim never changes the registry. It ranks every registered work within
//! the similarity threshold of the claimed content and names the registrant of
//! the best candidate as the presumed original owner.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::error::Result;
use crate::record::{Claim, SimilarityMatch};
use crate::settings::RegistrySettings;
use crate::store::FingerprintStore;

/// Claim type reported when the claimant did not give one.
pub const UNSPECIFIED_CLAIM_TYPE: &str = "unspecified";

/// Advisory verdict for a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Nothing on record is close enough to the claimed content.
    NoMatch,
    /// A prior registration was found.
    Resolved(ClaimVerdict),
}

impl ClaimOutcome {
    pub fn message(&self) -> String {
        match self {
            Self::NoMatch => "No close fingerprint found in the registry. \
                There is no strong prior owner on record."
                .to_string(),
            Self::Resolved(verdict) => verdict.message(),
        }
    }
}

/// Details of the prior registration that wins a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimVerdict {
    pub original_owner: String,
    pub claimant: String,
    /// Whether the claimant is the registrant on record
    pub same_user: bool,
    pub matched_id: u64,
    pub matched_file: String,
    pub distance: u32,
    pub registered_at: DateTime<Utc>,
    pub claim_type: String,
    pub evidence_count: u32,
}

impl ClaimVerdict {
    /// Human-readable summary of the verdict.
    pub fn message(&self) -> String {
        if self.same_user {
            "Claimant already appears to be the original registrant.".to_string()
        } else {
            format!(
                "Registry suggests original registration by {} based on earliest fingerprint on record.",
                self.original_owner
            )
        }
    }
}

/// Rank candidates: closest first, then earliest registration, then lowest id.
///
/// The id tie-break makes the order total, so the same store always yields
/// the same winner.
pub fn rank_candidates(candidates: &mut [SimilarityMatch]) {
    candidates.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then_with(|| a.record.created_at.cmp(&b.record.created_at))
            .then_with(|| a.record.id.cmp(&b.record.id))
    });
}

/// Read-only resolver for ownership disputes.
#[derive(Debug, Clone)]
pub struct ClaimResolver {
    store: Arc<FingerprintStore>,
    settings: RegistrySettings,
}

impl ClaimResolver {
    pub fn new(store: Arc<FingerprintStore>, settings: RegistrySettings) -> Self {
        Self { store, settings }
    }

    /// Resolve a claim against the current registry contents.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Validation`] if claimant, hashes or
    /// file name are empty.
    #[instrument(skip_all, fields(claimant = %claim.claimant, file_name = %claim.file_name))]
    pub fn resolve_claim(&self, claim: Claim) -> Result<ClaimOutcome> {
        claim.validate()?;

        let mut candidates = self
            .store
            .find_within_threshold(&claim.perceptual_hash, self.settings.similarity_threshold);

        rank_candidates(&mut candidates);

        let Some(best) = candidates.into_iter().next() else {
            info!("No registered fingerprint close to claimed content");
            return Ok(ClaimOutcome::NoMatch);
        };

        let original = best.record;
        let verdict = ClaimVerdict {
            same_user: original.owner == claim.claimant,
            original_owner: original.owner,
            claimant: claim.claimant,
            matched_id: original.id,
            matched_file: original.file_name,
            distance: best.distance,
            registered_at: original.created_at,
            claim_type: claim
                .claim_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNSPECIFIED_CLAIM_TYPE.to_string()),
            evidence_count: claim.evidence_count.unwrap_or(0),
        };

        info!(
            matched_id = verdict.matched_id,
            original_owner = %verdict.original_owner,
            distance = verdict.distance,
            same_user = verdict.same_user,
            "Claim resolved"
        );

        Ok(ClaimOutcome::Resolved(verdict))
    }
}
