//! Simulated ledger services.
//!
//! Each kind stands in for an external chain integration and derives its
//! references deterministically from the event, so repeated runs are stable.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{prefix, DownstreamNotifier, MintedEvent, NotificationReceipt};
use crate::error::Result;

/// Which downstream service is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    /// Fingerprint anchored into transaction metadata
    Anchor,
    /// Ownership token minted
    Mint,
    /// Zero-knowledge ownership proof generated
    Proof,
    /// Off-chain channel update batching future claims
    Channel,
}

impl LedgerKind {
    pub const ALL: [LedgerKind; 4] = [Self::Anchor, Self::Mint, Self::Proof, Self::Channel];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Anchor => "cardano-anchor",
            Self::Mint => "polygon-mint",
            Self::Proof => "midnight-proof",
            Self::Channel => "hydra-channel",
        }
    }
}

impl std::fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Deterministic stand-in for one ledger service.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedLedger {
    kind: LedgerKind,
}

impl SimulatedLedger {
    pub fn new(kind: LedgerKind) -> Self {
        Self { kind }
    }

    /// One notifier per ledger kind.
    pub fn all() -> Vec<Arc<dyn DownstreamNotifier>> {
        LedgerKind::ALL
            .into_iter()
            .map(|kind| Arc::new(Self::new(kind)) as Arc<dyn DownstreamNotifier>)
            .collect()
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    fn receipt(&self, event: &MintedEvent) -> NotificationReceipt {
        let hash = event.exact_hash.as_str();
        let (network, reference, secondary_reference, message) = match self.kind {
            LedgerKind::Anchor => (
                "cardano-preprod",
                format!("cardano_tx_{}", prefix(hash, 16)),
                None,
                "Content fingerprint anchored on Cardano (simulated).",
            ),
            LedgerKind::Mint => (
                "polygon-amoy",
                format!("poly_{}", prefix(hash, 8)),
                Some(format!("0x{}", prefix(hash, 64))),
                "Polygon ERC-721 NFT minted (simulated).",
            ),
            LedgerKind::Proof => (
                "midnight",
                format!("midnight_proof_{}", prefix(hash, 10)),
                None,
                "Midnight-style ZKP generated (simulated).",
            ),
            LedgerKind::Channel => (
                "hydra",
                format!("hydra_channel_{}", event.owner),
                Some(format!("hydra_offchain_tx_{}", prefix(hash, 12))),
                "Hydra off-chain update recorded (simulated) to batch future claims.",
            ),
        };

        NotificationReceipt {
            notifier: self.kind.name().to_string(),
            network: network.to_string(),
            reference,
            secondary_reference,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl DownstreamNotifier for SimulatedLedger {
    async fn notify(&self, event: &MintedEvent) -> Result<NotificationReceipt> {
        Ok(self.receipt(event))
    }

    fn name(&self) -> &str {
        self.kind.name()
    }
}
