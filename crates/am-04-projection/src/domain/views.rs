//! # Typed View Models
//!
//! One struct per consumer-facing shape, each built by a pure function of a
//! [`JoinedRequest`] and the current time.

use super::derivations::{audit_package, deadline_label, estimated_lines_of_code, progress};
use am_01_persistence::JoinedRequest;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{AuditStatus, Complexity, NftRecord, SeverityBreakdown};

/// A marketplace card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    pub id: String,
    pub project_name: String,
    pub description: String,
    pub repository_url: String,
    pub complexity: Complexity,
    #[serde(with = "rust_decimal::serde::float")]
    pub proposed_price: Decimal,
    pub estimated_duration_days: u32,
    pub auditor_count: u32,
    pub developer_wallet: String,
    pub status: AuditStatus,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub audit_package: String,
    pub deadline: String,
    pub lines_of_code: u32,
    pub progress: u8,
    pub contract_name: Option<String>,
    pub contract_type: Option<String>,
    pub auditor_wallet: Option<String>,
    pub auditor_name: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub accepted_price: Option<Decimal>,
    pub nft_token_id: Option<String>,
    pub metadata_hash: Option<String>,
}

/// A developer or auditor dashboard card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCardView {
    pub id: String,
    pub project_name: String,
    pub status: AuditStatus,
    pub complexity: Complexity,
    /// Accepted price once claimed, proposed price before.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub progress: u8,
    pub deadline: String,
    pub audit_package: String,
    pub developer_wallet: String,
    pub auditor_wallet: Option<String>,
    pub auditor_name: Option<String>,
    pub owner_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub estimated_completion_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Unknown until results are submitted.
    pub findings_count: Option<u32>,
    pub severity_breakdown: Option<SeverityBreakdown>,
    pub certificate_nft_id: Option<String>,
}

/// Minted token as shown on a verification page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftSummary {
    pub token_id: String,
    pub transaction_hash: String,
    pub metadata_uri: String,
    pub recipient_wallet: String,
}

impl From<&NftRecord> for NftSummary {
    fn from(nft: &NftRecord) -> Self {
        Self {
            token_id: nft.token_id.clone(),
            transaction_hash: nft.transaction_hash.clone(),
            metadata_uri: nft.metadata_uri.clone(),
            recipient_wallet: nft.recipient_wallet.clone(),
        }
    }
}

/// Public proof that an audit happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationView {
    pub request_id: String,
    pub project_name: String,
    pub repository_hash: String,
    pub status: AuditStatus,
    pub developer_wallet: String,
    pub auditor_wallet: Option<String>,
    pub auditor_name: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub ipfs_hash: Option<String>,
    pub evidence_hashes: Vec<String>,
    pub findings_count: Option<u32>,
    pub severity_breakdown: Option<SeverityBreakdown>,
    pub request_nft: Option<NftSummary>,
    pub certificate: Option<NftSummary>,
    /// Parsed evidence bundle; `None` when absent or unreadable.
    pub evidence: Option<Value>,
    /// Why `evidence` could not be loaded.
    pub ipfs_error: Option<String>,
    /// Completed with a result on record.
    pub verified: bool,
}

/// Start of the audit clock: the owner's start date, the mirrored request
/// start date, or submission.
fn started_at(joined: &JoinedRequest) -> DateTime<Utc> {
    joined
        .owner
        .as_ref()
        .map(|o| o.start_date)
        .or(joined.request.start_date)
        .unwrap_or(joined.request.created_at)
}

pub fn project_listing(joined: &JoinedRequest, now: DateTime<Utc>) -> ListingView {
    let request = &joined.request;
    let contract_type = joined.contract.as_ref().map(|c| c.contract_type.clone());
    ListingView {
        id: request.id.clone(),
        project_name: request.project_name.clone(),
        description: request.description.clone(),
        repository_url: request.repository_url.clone(),
        complexity: request.complexity,
        proposed_price: request.proposed_price,
        estimated_duration_days: request.estimated_duration_days,
        auditor_count: request.auditor_count,
        developer_wallet: request.developer_wallet.clone(),
        status: request.status,
        tags: request.tags.clone(),
        created_at: request.created_at,
        audit_package: audit_package(request.complexity, request.estimated_duration_days)
            .as_str()
            .to_string(),
        deadline: deadline_label(request.created_at, request.estimated_duration_days, now),
        lines_of_code: estimated_lines_of_code(contract_type.as_deref(), request.complexity),
        progress: progress(
            request.status,
            started_at(joined),
            request.estimated_duration_days,
            now,
        ),
        contract_name: joined.contract.as_ref().map(|c| c.name.clone()),
        contract_type,
        auditor_wallet: joined.owner.as_ref().map(|o| o.auditor_wallet.clone()),
        auditor_name: joined.owner.as_ref().map(|o| o.auditor_name.clone()),
        accepted_price: joined.owner.as_ref().map(|o| o.accepted_price),
        nft_token_id: joined.nft.as_ref().map(|n| n.token_id.clone()),
        metadata_hash: joined.ipfs.as_ref().map(|i| i.content_hash.clone()),
    }
}

pub fn project_dashboard_card(joined: &JoinedRequest, now: DateTime<Utc>) -> DashboardCardView {
    let request = &joined.request;
    let owner = joined.owner.as_ref();
    DashboardCardView {
        id: request.id.clone(),
        project_name: request.project_name.clone(),
        status: request.status,
        complexity: request.complexity,
        price: owner.map_or(request.proposed_price, |o| o.accepted_price),
        progress: progress(
            request.status,
            started_at(joined),
            request.estimated_duration_days,
            now,
        ),
        deadline: deadline_label(request.created_at, request.estimated_duration_days, now),
        audit_package: audit_package(request.complexity, request.estimated_duration_days)
            .as_str()
            .to_string(),
        developer_wallet: request.developer_wallet.clone(),
        auditor_wallet: owner.map(|o| o.auditor_wallet.clone()),
        auditor_name: owner.map(|o| o.auditor_name.clone()),
        owner_id: owner.map(|o| o.id.clone()),
        start_date: owner.map(|o| o.start_date).or(request.start_date),
        estimated_completion_date: owner
            .map(|o| o.estimated_completion_date)
            .or(request.estimated_completion_date),
        completed_at: joined
            .result
            .as_ref()
            .map(|r| r.completed_at)
            .or_else(|| owner.and_then(|o| o.completed_at)),
        findings_count: joined.result.as_ref().map(|r| r.findings_count),
        severity_breakdown: joined.result.as_ref().map(|r| r.severity_breakdown),
        certificate_nft_id: joined.result.as_ref().and_then(|r| r.nft_id.clone()),
    }
}

/// Build the verification payload.
///
/// `evidence` is the outcome of fetching the result's evidence bundle;
/// `None` when there was nothing to fetch.
pub fn verification_view(
    joined: &JoinedRequest,
    certificate: Option<&NftRecord>,
    evidence: Option<Result<Value, String>>,
) -> VerificationView {
    let request = &joined.request;
    let result = joined.result.as_ref();
    let (evidence, ipfs_error) = match evidence {
        Some(Ok(value)) => (Some(value), None),
        Some(Err(message)) => (None, Some(message)),
        None => (None, None),
    };
    VerificationView {
        request_id: request.id.clone(),
        project_name: request.project_name.clone(),
        repository_hash: request.repository_hash.clone(),
        status: request.status,
        developer_wallet: request.developer_wallet.clone(),
        auditor_wallet: joined.owner.as_ref().map(|o| o.auditor_wallet.clone()),
        auditor_name: joined.owner.as_ref().map(|o| o.auditor_name.clone()),
        completed_at: result.map(|r| r.completed_at),
        ipfs_hash: result.map(|r| r.ipfs_hash.clone()),
        evidence_hashes: result.map(|r| r.evidence_hashes.clone()).unwrap_or_default(),
        findings_count: result.map(|r| r.findings_count),
        severity_breakdown: result.map(|r| r.severity_breakdown),
        request_nft: joined.nft.as_ref().map(NftSummary::from),
        certificate: certificate.map(NftSummary::from),
        evidence,
        ipfs_error,
        verified: request.status == AuditStatus::Completed && result.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use shared_types::{
        AuditOwner, AuditRequest, AuditResult, OwnerStatus, ResultStatus, SmartContract,
    };

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
    }

    fn request(status: AuditStatus) -> AuditRequest {
        AuditRequest {
            id: "r1".into(),
            project_name: "Pool".into(),
            description: "AMM pool".into(),
            repository_url: "https://github.com/acme/pool".into(),
            repository_hash: "0xabc".into(),
            complexity: Complexity::High,
            proposed_price: Decimal::new(2000, 0),
            estimated_duration_days: 5,
            auditor_count: 1,
            developer_wallet: "0xdev".into(),
            status,
            tags: vec!["defi".into()],
            created_at: t0(),
            updated_at: t0(),
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

    fn owner() -> AuditOwner {
        let start = t0() + Duration::days(1);
        AuditOwner {
            id: "o1".into(),
            audit_request_id: "r1".into(),
            auditor_wallet: "0xaud".into(),
            auditor_name: "Ann".into(),
            accepted_price: Decimal::new(1800, 0),
            start_date: start,
            estimated_completion_date: start + Duration::days(4),
            status: OwnerStatus::InProgress,
            nft_id: None,
            completed_at: None,
            created_at: start,
            updated_at: start,
        }
    }

    fn result() -> AuditResult {
        AuditResult {
            id: "res1".into(),
            audit_request_id: "r1".into(),
            audit_owner_id: "o1".into(),
            ipfs_hash: "Qmbundle".into(),
            evidence_hashes: vec!["Qmfile".into()],
            findings_count: 3,
            vulnerabilities_count: 1,
            severity_breakdown: SeverityBreakdown {
                critical: 1,
                high: 1,
                medium: 0,
                low: 1,
            },
            contract_hash: None,
            notes: None,
            completed_at: t0() + Duration::days(4),
            nft_id: Some("nft-res".into()),
            status: ResultStatus::Completed,
        }
    }

    #[test]
    fn test_listing_derives_display_fields() {
        let mut joined = JoinedRequest::bare(request(AuditStatus::Available));
        joined.contract = Some(SmartContract {
            id: "c1".into(),
            audit_request_id: "r1".into(),
            name: "Pool".into(),
            contract_type: "DeFi".into(),
            network: None,
            address: None,
            source_hash: None,
            created_at: t0(),
        });

        let view = project_listing(&joined, t0() + Duration::days(2));
        assert_eq!(view.audit_package, "Standard");
        assert_eq!(view.deadline, "3 days");
        assert_eq!(view.lines_of_code, 1200);
        assert_eq!(view.progress, 0);
        assert_eq!(view.contract_type.as_deref(), Some("DeFi"));
        assert!(view.auditor_wallet.is_none());
    }

    #[test]
    fn test_listing_deadline_examples() {
        let joined = JoinedRequest::bare(request(AuditStatus::Available));
        assert_eq!(project_listing(&joined, t0() + Duration::days(6)).deadline, "Overdue");
        assert_eq!(project_listing(&joined, t0() + Duration::days(4)).deadline, "1 day");
        assert_eq!(project_listing(&joined, t0() + Duration::days(2)).deadline, "3 days");
    }

    #[test]
    fn test_card_progress_runs_from_owner_start() {
        let mut joined = JoinedRequest::bare(request(AuditStatus::InProgress));
        joined.owner = Some(owner());

        let card = project_dashboard_card(&joined, t0() + Duration::days(3) + Duration::hours(12));
        assert_eq!(card.progress, 50);
        assert_eq!(card.price, Decimal::new(1800, 0));
        assert_eq!(card.auditor_wallet.as_deref(), Some("0xaud"));
        assert_eq!(card.findings_count, None);
    }

    #[test]
    fn test_card_reports_findings_once_completed() {
        let mut joined = JoinedRequest::bare(request(AuditStatus::Completed));
        joined.owner = Some(owner());
        joined.result = Some(result());

        let card = project_dashboard_card(&joined, t0() + Duration::days(10));
        assert_eq!(card.progress, 100);
        assert_eq!(card.findings_count, Some(3));
        assert_eq!(card.certificate_nft_id.as_deref(), Some("nft-res"));
        assert_eq!(card.completed_at, Some(t0() + Duration::days(4)));
    }

    #[test]
    fn test_verification_surfaces_evidence_error() {
        let mut joined = JoinedRequest::bare(request(AuditStatus::Completed));
        joined.result = Some(result());

        let view = verification_view(&joined, None, Some(Err("gateway timed out".into())));
        assert!(view.evidence.is_none());
        assert_eq!(view.ipfs_error.as_deref(), Some("gateway timed out"));
        assert!(view.verified);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["evidence"].is_null());
        assert_eq!(json["ipfsError"], "gateway timed out");
    }

    #[test]
    fn test_verification_without_result_is_unverified() {
        let joined = JoinedRequest::bare(request(AuditStatus::InProgress));
        let view = verification_view(&joined, None, None);
        assert!(!view.verified);
        assert!(view.ipfs_error.is_none());
        assert!(view.evidence_hashes.is_empty());
    }
}
