//! # Core Domain Entities
//!
//! The persisted record shapes of the marketplace.
//!
//! ## Clusters
//!
//! - **Lifecycle**: `AuditRequest`, `AuditOwner`, `AuditResult`
//! - **Evidence**: `Finding`, `SeverityBreakdown`
//! - **Supporting (write-once)**: `SmartContract`, `NftRecord`, `IpfsRecord`
//! - **Profiles**: `Developer`
//! - **Collaborator payloads**: `RepositoryStats`, `CostEstimate`
//!
//! All records serialize camelCase so the same shape crosses the REST API,
//! the relational JSON documents and the flat-table fields without loss.

use crate::record::{Collection, Record};
use crate::status::{
    AuditStatus, Complexity, EstimatorComplexity, FindingStatus, IpfsContentKind, NftKind,
    OwnerStatus, ResultStatus, Severity,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque string identifier assigned by the service.
pub type RecordId = String;

/// Blockchain wallet address, treated as an opaque string.
pub type WalletAddress = String;

/// UTC timestamp.
pub type Timestamp = DateTime<Utc>;

// =============================================================================
// CLUSTER A: LIFECYCLE
// =============================================================================

/// A developer's submission seeking a security review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequest {
    pub id: RecordId,
    pub project_name: String,
    pub description: String,
    pub repository_url: String,
    /// Hash over repository URL and submission time. Not a commitment over code.
    pub repository_hash: String,
    pub complexity: Complexity,
    #[serde(with = "rust_decimal::serde::float")]
    pub proposed_price: Decimal,
    pub estimated_duration_days: u32,
    pub auditor_count: u32,
    pub developer_wallet: WalletAddress,
    pub status: AuditStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Mirrors the owner's start date once accepted.
    pub start_date: Option<Timestamp>,
    /// Mirrors the owner's estimated completion date once accepted.
    pub estimated_completion_date: Option<Timestamp>,
    pub smart_contract_id: Option<RecordId>,
    pub nft_id: Option<RecordId>,
    pub ipfs_record_id: Option<RecordId>,
    pub payment_reference: Option<String>,
    pub repository_stats: Option<RepositoryStats>,
    pub estimate: Option<CostEstimate>,
    pub cancellation_reason: Option<String>,
}

impl Record for AuditRequest {
    const COLLECTION: Collection = Collection::AuditRequests;

    fn id(&self) -> &str {
        &self.id
    }
}

/// An auditor's acceptance of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditOwner {
    pub id: RecordId,
    pub audit_request_id: RecordId,
    pub auditor_wallet: WalletAddress,
    pub auditor_name: String,
    /// May differ from the request's proposed price.
    #[serde(with = "rust_decimal::serde::float")]
    pub accepted_price: Decimal,
    pub start_date: Timestamp,
    pub estimated_completion_date: Timestamp,
    pub status: OwnerStatus,
    pub nft_id: Option<RecordId>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record for AuditOwner {
    const COLLECTION: Collection = Collection::AuditOwners;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Counts of findings per severity bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityBreakdown {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl SeverityBreakdown {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low
    }

    pub fn merge(&mut self, other: &SeverityBreakdown) {
        self.critical += other.critical;
        self.high += other.high;
        self.medium += other.medium;
        self.low += other.low;
    }
}

/// The finished-audit record. Evidentiary fields are immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub id: RecordId,
    pub audit_request_id: RecordId,
    pub audit_owner_id: RecordId,
    /// Content hash of the uploaded evidence bundle.
    pub ipfs_hash: String,
    /// Content hashes of individually uploaded evidence files.
    #[serde(default)]
    pub evidence_hashes: Vec<String>,
    pub findings_count: u32,
    pub vulnerabilities_count: u32,
    pub severity_breakdown: SeverityBreakdown,
    pub contract_hash: Option<String>,
    pub notes: Option<String>,
    pub completed_at: Timestamp,
    pub nft_id: Option<RecordId>,
    pub status: ResultStatus,
}

impl Record for AuditResult {
    const COLLECTION: Collection = Collection::AuditResults;

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// CLUSTER B: FINDINGS
// =============================================================================

/// One discrete vulnerability or observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: RecordId,
    pub audit_request_id: RecordId,
    pub auditor_wallet: WalletAddress,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: String,
    pub file_path: Option<String>,
    pub line_number: Option<u32>,
    pub function_name: Option<String>,
    pub vulnerability_type: Option<String>,
    pub impact: Option<String>,
    pub recommendation: Option<String>,
    pub proof_of_concept: Option<String>,
    #[serde(default)]
    pub evidence_files: Vec<String>,
    #[serde(default)]
    pub code_snippets: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: u32,
    pub estimated_effort: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub status: FindingStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record for Finding {
    const COLLECTION: Collection = Collection::Findings;

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// CLUSTER C: SUPPORTING RECORDS
// =============================================================================

/// On-chain contract metadata for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartContract {
    pub id: RecordId,
    pub audit_request_id: RecordId,
    pub name: String,
    /// Free-form type label (Token, NFT, DeFi, Governance, Marketplace, ...).
    pub contract_type: String,
    pub network: Option<String>,
    pub address: Option<String>,
    pub source_hash: Option<String>,
    pub created_at: Timestamp,
}

impl Record for SmartContract {
    const COLLECTION: Collection = Collection::SmartContracts;

    fn id(&self) -> &str {
        &self.id
    }
}

/// A minted token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftRecord {
    pub id: RecordId,
    pub audit_request_id: RecordId,
    pub kind: NftKind,
    pub token_id: String,
    pub transaction_hash: String,
    pub recipient_wallet: WalletAddress,
    /// Points at the IPFS record holding the token metadata.
    pub metadata_uri: String,
    pub ipfs_record_id: Option<RecordId>,
    pub created_at: Timestamp,
}

impl Record for NftRecord {
    const COLLECTION: Collection = Collection::Nfts;

    fn id(&self) -> &str {
        &self.id
    }
}

/// A content-addressed storage pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpfsRecord {
    pub id: RecordId,
    pub audit_request_id: RecordId,
    pub kind: IpfsContentKind,
    pub content_hash: String,
    pub file_name: Option<String>,
    pub size_bytes: Option<u64>,
    pub created_at: Timestamp,
}

impl Record for IpfsRecord {
    const COLLECTION: Collection = Collection::IpfsRecords;

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// CLUSTER D: PROFILES
// =============================================================================

/// Aggregate profile per developer wallet. Upserted on recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    pub id: RecordId,
    pub wallet: WalletAddress,
    pub total_projects: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spend: Decimal,
    pub reputation_score: u32,
    pub first_activity: Timestamp,
    pub last_activity: Timestamp,
    pub updated_at: Timestamp,
}

impl Record for Developer {
    const COLLECTION: Collection = Collection::Developers;

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// CLUSTER E: COLLABORATOR PAYLOADS
// =============================================================================

/// Output of the repository analyzer. Opaque to the lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStats {
    pub file_count: u32,
    pub line_count: u64,
    pub complexity: Complexity,
}

/// Output of the cost estimator, in the estimator's own vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub complexity: EstimatorComplexity,
    pub duration_days: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> AuditRequest {
        let now = Utc::now();
        AuditRequest {
            id: "req-1".into(),
            project_name: "Vault".into(),
            description: "ERC-4626 vault".into(),
            repository_url: "https://github.com/acme/vault".into(),
            repository_hash: "0xabc".into(),
            complexity: Complexity::High,
            proposed_price: Decimal::new(250_050, 2),
            estimated_duration_days: 7,
            auditor_count: 1,
            developer_wallet: "0xdev".into(),
            status: AuditStatus::Available,
            tags: vec!["defi".into()],
            created_at: now,
            updated_at: now,
            start_date: None,
            estimated_completion_date: None,
            smart_contract_id: None,
            nft_id: None,
            ipfs_record_id: None,
            payment_reference: None,
            repository_stats: None,
            estimate: None,
            cancellation_reason: None,
        }
    }

    #[test]
    fn test_request_document_is_camel_case() {
        let doc = serde_json::to_value(sample_request()).unwrap();
        assert_eq!(doc["projectName"], "Vault");
        assert_eq!(doc["developerWallet"], "0xdev");
        assert_eq!(doc["status"], "Available");
        assert_eq!(doc["proposedPrice"], 2500.5);
    }

    #[test]
    fn test_request_survives_json_boundary() {
        let request = sample_request();
        let json = serde_json::to_string(&request).unwrap();
        let back: AuditRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_severity_breakdown_counts() {
        let mut breakdown = SeverityBreakdown::default();
        breakdown.record(Severity::High);
        breakdown.record(Severity::High);
        breakdown.record(Severity::Low);
        assert_eq!(breakdown.high, 2);
        assert_eq!(breakdown.total(), 3);
    }
}
