//! # Persisted Record Contract
//!
//! Every entity is stored as a camelCase JSON document in one collection.
//! Backends only ever see documents; the typed layer above them uses
//! [`Record`] to move between documents and entities.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The entity collections a backend must provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    AuditRequests,
    AuditOwners,
    AuditResults,
    Findings,
    SmartContracts,
    Nfts,
    IpfsRecords,
    Developers,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Self::AuditRequests,
        Self::AuditOwners,
        Self::AuditResults,
        Self::Findings,
        Self::SmartContracts,
        Self::Nfts,
        Self::IpfsRecords,
        Self::Developers,
    ];

    /// Relational table name.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::AuditRequests => "audit_requests",
            Self::AuditOwners => "audit_owners",
            Self::AuditResults => "audit_results",
            Self::Findings => "findings",
            Self::SmartContracts => "smart_contracts",
            Self::Nfts => "nfts",
            Self::IpfsRecords => "ipfs_records",
            Self::Developers => "developers",
        }
    }

    /// Flat-table (Airtable) table name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AuditRequests => "Audit Requests",
            Self::AuditOwners => "Audit Owners",
            Self::AuditResults => "Audit Results",
            Self::Findings => "Findings",
            Self::SmartContracts => "Smart Contracts",
            Self::Nfts => "NFTs",
            Self::IpfsRecords => "IPFS Records",
            Self::Developers => "Developers",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// An entity that lives in exactly one collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection holding this entity.
    const COLLECTION: Collection;

    /// Opaque string identifier.
    fn id(&self) -> &str;
}

/// Document field names used by filters and patches.
///
/// These are the camelCase serde names of entity fields.
pub mod fields {
    pub const ID: &str = "id";
    pub const STATUS: &str = "status";
    pub const COMPLEXITY: &str = "complexity";
    pub const TAGS: &str = "tags";
    pub const DEVELOPER_WALLET: &str = "developerWallet";
    pub const AUDITOR_WALLET: &str = "auditorWallet";
    pub const AUDIT_REQUEST_ID: &str = "auditRequestId";
    pub const AUDIT_OWNER_ID: &str = "auditOwnerId";
    pub const WALLET: &str = "wallet";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const START_DATE: &str = "startDate";
    pub const ESTIMATED_COMPLETION_DATE: &str = "estimatedCompletionDate";
    pub const COMPLETED_AT: &str = "completedAt";
    pub const NFT_ID: &str = "nftId";
    pub const IPFS_RECORD_ID: &str = "ipfsRecordId";
    pub const SMART_CONTRACT_ID: &str = "smartContractId";
    pub const PAYMENT_REFERENCE: &str = "paymentReference";
    pub const CANCELLATION_REASON: &str = "cancellationReason";
}
