//! Payloads exchanged with collaborators.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A pointer to content written to evidence storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredContent {
    /// Content hash (CID for IPFS-backed storage).
    pub hash: String,
    pub size_bytes: u64,
}

/// A single evidence file supplied by an auditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceFile {
    pub name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// ERC-721 style token metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    /// URI of the metadata document in evidence storage.
    pub external_url: Option<String>,
    #[serde(default)]
    pub attributes: Vec<NftAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: serde_json::Value,
}

impl NftMetadata {
    pub fn attribute(mut self, trait_type: &str, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.push(NftAttribute {
            trait_type: trait_type.to_string(),
            value: value.into(),
        });
        self
    }
}

/// Outcome of a mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintReceipt {
    pub token_id: String,
    pub transaction_hash: String,
}

/// A charge for a newly submitted audit request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub audit_request_id: String,
    pub payer_wallet: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub reference: String,
}
