//! Simulated NFT minting.
//!
//! No contract is deployed; token ids count up from 1 and transaction
//! hashes are derived from the mint inputs so they are stable in tests.

use crate::domain::{CollaboratorError, MintReceipt, NftMetadata};
use crate::ports::outbound::NftMinter;
use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

const COLLABORATOR: &str = "nft-minter";

/// Minter that records nothing on chain.
#[derive(Default)]
pub struct SimulatedNftMinter {
    next_token: AtomicU64,
    issued: Mutex<Vec<NftMetadata>>,
    /// Should fail?
    pub should_fail: bool,
}

impl SimulatedNftMinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Number of successful mints.
    pub fn minted(&self) -> u64 {
        self.next_token.load(Ordering::SeqCst)
    }

    /// Metadata of the most recent successful mint.
    pub fn last_metadata(&self) -> Option<NftMetadata> {
        self.issued.lock().last().cloned()
    }
}

#[async_trait]
impl NftMinter for SimulatedNftMinter {
    async fn mint(
        &self,
        metadata: &NftMetadata,
        recipient_wallet: &str,
    ) -> Result<MintReceipt, CollaboratorError> {
        if self.should_fail {
            return Err(CollaboratorError::rejected(COLLABORATOR, "mint reverted"));
        }

        let token = self.next_token.fetch_add(1, Ordering::SeqCst) + 1;
        let mut hasher = Sha256::new();
        hasher.update(recipient_wallet.as_bytes());
        hasher.update(token.to_be_bytes());
        hasher.update(metadata.name.as_bytes());
        let transaction_hash = format!("0x{}", hex::encode(hasher.finalize()));

        self.issued.lock().push(metadata.clone());

        info!(
            "[am-02] Minted token {} for {} ({})",
            token, recipient_wallet, metadata.name
        );
        Ok(MintReceipt {
            token_id: token.to_string(),
            transaction_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> NftMetadata {
        NftMetadata {
            name: "Audit Certificate".into(),
            description: "Vault audit".into(),
            external_url: None,
            attributes: Vec::new(),
        }
        .attribute("findings", 3)
    }

    #[tokio::test]
    async fn test_token_ids_increase() {
        let minter = SimulatedNftMinter::new();
        let first = minter.mint(&metadata(), "0xdev").await.unwrap();
        let second = minter.mint(&metadata(), "0xdev").await.unwrap();
        assert_eq!(first.token_id, "1");
        assert_eq!(second.token_id, "2");
        assert_ne!(first.transaction_hash, second.transaction_hash);
        assert!(first.transaction_hash.starts_with("0x"));
        assert_eq!(minter.minted(), 2);
        assert_eq!(minter.last_metadata(), Some(metadata()));
    }

    #[tokio::test]
    async fn test_failing_minter() {
        let minter = SimulatedNftMinter::failing();
        let err = minter.mint(&metadata(), "0xdev").await.unwrap_err();
        assert_eq!(err.collaborator(), "nft-minter");
        assert_eq!(minter.minted(), 0);
        assert!(minter.last_metadata().is_none());
    }
}
