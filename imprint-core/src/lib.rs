//! Imprint Core - content fingerprint registry
//!
//! This crate decides who registered a piece of content first. Each work is
//! identified by an exact hash (byte identity) and a perceptual hash (visual
//! similarity, compared by Hamming distance).
//!
//! # Features
//!
//! - First-come registration with exact and near-duplicate rejection
//! - Read-only claim resolution naming the presumed original owner
//! - Atomic check-then-commit over a thread-safe in-memory store
//! - Fire-and-forget downstream notifications for newly minted records
//! - Image fingerprinting: SHA3-256 plus a 1024-bit average hash (`codec` feature)
//!
//! # Example
//!
//! ```
//! use imprint_core::{Claim, ClaimOutcome, Registry, Submission};
//!
//! let registry = Registry::default();
//! registry
//!     .register(Submission::new("alice", "H1", "0000", "cat.png", "dev-1"))
//!     .unwrap();
//!
//! let outcome = registry
//!     .resolve_claim(Claim::new("bob", "H2", "0001", "cat-copy.png"))
//!     .unwrap();
//!
//! match outcome {
//!     ClaimOutcome::Resolved(verdict) => assert_eq!(verdict.original_owner, "alice"),
//!     ClaimOutcome::NoMatch => unreachable!(),
//! }
//! ```

pub mod claim;
pub mod error;
pub mod notify;
pub mod record;
pub mod registration;
pub mod registry;
pub mod settings;
pub mod similarity;
pub mod store;

#[cfg(feature = "codec")]
pub mod fingerprint;

pub use claim::{rank_candidates, ClaimOutcome, ClaimResolver, ClaimVerdict, UNSPECIFIED_CLAIM_TYPE};
pub use error::{require_fields, RegistryError, Result};
pub use notify::{
    DeliveryLog, DeliveryStatus, DispatchStatus, DownstreamNotifier, LedgerKind, MintedEvent,
    NotificationDispatcher, NotificationReceipt, RecordingNotifier, SimulatedLedger,
};
pub use record::{Claim, ContentRecord, RecordStatus, SimilarityMatch, Submission};
pub use registration::{MatchKind, RegistrationOutcome, RegistrationResolver};
pub use registry::{RegistrationReport, Registry, RegistryBuilder};
pub use settings::RegistrySettings;
pub use similarity::{hamming_distance, is_within, DEFAULT_SIMILARITY_THRESHOLD};
pub use store::{Clock, FingerprintStore, StoreSnapshot, StoreTransaction, SystemClock};

#[cfg(feature = "network")]
pub use notify::{WebhookConfig, WebhookNotifier};

#[cfg(feature = "codec")]
pub use fingerprint::Fingerprint;
