//! # Outbound Ports
//!
//! Narrow call contracts for the systems the lifecycle depends on.
//! Every call is an I/O suspension point bounded by the collaborator
//! timeout.

use crate::domain::{
    CollaboratorError, EvidenceFile, MintReceipt, NftMetadata, PaymentReceipt, PaymentRequest,
    StoredContent,
};
use async_trait::async_trait;
use shared_types::{CostEstimate, RepositoryStats};

/// Content-addressed evidence storage (IPFS-like).
#[async_trait]
pub trait EvidenceStorage: Send + Sync {
    /// Store a JSON document under a display name.
    async fn store_json(
        &self,
        name: &str,
        content: &serde_json::Value,
    ) -> Result<StoredContent, CollaboratorError>;

    /// Store one raw file.
    async fn store_file(&self, file: &EvidenceFile) -> Result<StoredContent, CollaboratorError>;

    /// Raw bytes stored under `hash`.
    async fn retrieve(&self, hash: &str) -> Result<Vec<u8>, CollaboratorError>;

    /// Stored content parsed as JSON.
    async fn retrieve_json(&self, hash: &str) -> Result<serde_json::Value, CollaboratorError> {
        let bytes = self.retrieve(hash).await?;
        serde_json::from_slice(&bytes).map_err(|e| CollaboratorError::InvalidContent {
            hash: hash.to_string(),
            message: e.to_string(),
        })
    }

    /// Public URI for a hash.
    fn uri_for(&self, hash: &str) -> String {
        format!("ipfs://{hash}")
    }
}

/// NFT minting. A black box that may fail.
#[async_trait]
pub trait NftMinter: Send + Sync {
    async fn mint(
        &self,
        metadata: &NftMetadata,
        recipient_wallet: &str,
    ) -> Result<MintReceipt, CollaboratorError>;
}

/// Payment collection at submission. No real settlement.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: &PaymentRequest) -> Result<PaymentReceipt, CollaboratorError>;
}

/// Repository metrics. Results are consumed as opaque data.
#[async_trait]
pub trait RepositoryAnalyzer: Send + Sync {
    async fn analyze(&self, repository_url: &str) -> Result<RepositoryStats, CollaboratorError>;
}

/// Audit cost and duration estimation.
#[async_trait]
pub trait CostEstimator: Send + Sync {
    async fn estimate(
        &self,
        code_sample: &str,
        stats: &RepositoryStats,
    ) -> Result<CostEstimate, CollaboratorError>;
}
