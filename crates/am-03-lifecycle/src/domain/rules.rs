//! Pure lifecycle rules.

use am_01_persistence::Filter;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use shared_types::{
    fields, AuditOwner, AuditRequest, AuditStatus, Developer, OwnerStatus, SeverityBreakdown,
};

/// Count findings per severity label.
///
/// Matching is exact and case-sensitive against `critical`, `high`,
/// `medium` and `low`; any other label is not counted.
pub fn severity_breakdown(findings: &[serde_json::Value]) -> SeverityBreakdown {
    let mut breakdown = SeverityBreakdown::default();
    for finding in findings {
        match finding.get("severity").and_then(|s| s.as_str()) {
            Some("critical") => breakdown.critical += 1,
            Some("high") => breakdown.high += 1,
            Some("medium") => breakdown.medium += 1,
            Some("low") => breakdown.low += 1,
            _ => {}
        }
    }
    breakdown
}

/// Repository hash: `0x` + SHA-256 over the URL and the submission time.
///
/// Identifies a submission. It is not a commitment over repository contents.
pub fn repository_hash(repository_url: &str, submitted_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(repository_url.as_bytes());
    hasher.update(submitted_at.to_rfc3339().as_bytes());
    format!("0x{}", hex::encode(hasher.finalize()))
}

/// Guard matching a stored status label in any of its tolerated spellings.
pub fn status_guard(statuses: &[AuditStatus]) -> Filter {
    let labels = statuses.iter().flat_map(|status| match status {
        AuditStatus::Available => vec!["available"],
        AuditStatus::InProgress => vec!["in progress", "inprogress", "in_progress", "in-progress"],
        AuditStatus::Completed => vec!["completed"],
        AuditStatus::Cancelled => vec!["cancelled", "canceled"],
    });
    Filter::any_of_ignore_case(fields::STATUS, labels)
}

/// Reputation points per request status, capped at 100.
pub fn reputation_score(requests: &[AuditRequest]) -> u32 {
    let points: u32 = requests
        .iter()
        .map(|r| match r.status {
            AuditStatus::Completed => 10,
            AuditStatus::InProgress => 5,
            AuditStatus::Available => 1,
            AuditStatus::Cancelled => 0,
        })
        .sum();
    points.min(100)
}

/// Recompute a developer profile from their requests.
///
/// Spend counts the accepted price where an owner exists, else the
/// proposed price, over every request that is not cancelled.
pub fn developer_profile(
    wallet: &str,
    requests: &[AuditRequest],
    owners: &[AuditOwner],
    previous: Option<&Developer>,
    now: DateTime<Utc>,
) -> Developer {
    let total_spend = requests
        .iter()
        .filter(|r| r.status != AuditStatus::Cancelled)
        .map(|r| {
            owners
                .iter()
                .filter(|o| o.audit_request_id == r.id && o.status != OwnerStatus::Cancelled)
                .max_by_key(|o| o.created_at)
                .map_or(r.proposed_price, |o| o.accepted_price)
        })
        .fold(Decimal::ZERO, |acc, price| acc + price);

    let first_seen = requests.iter().map(|r| r.created_at).min();
    let last_seen = requests.iter().map(|r| r.updated_at).max();
    let first_activity = match (previous.map(|p| p.first_activity), first_seen) {
        (Some(a), Some(b)) => a.min(b),
        (a, b) => a.or(b).unwrap_or(now),
    };

    Developer {
        id: wallet.to_string(),
        wallet: wallet.to_string(),
        total_projects: u32::try_from(requests.len()).unwrap_or(u32::MAX),
        total_spend,
        reputation_score: reputation_score(requests),
        first_activity,
        last_activity: last_seen.unwrap_or(now).max(first_activity),
        updated_at: now,
    }
}
