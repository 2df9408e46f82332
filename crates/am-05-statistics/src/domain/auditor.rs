//! Per-auditor workload and earnings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{AuditOwner, OwnerStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditorSummary {
    pub wallet: String,
    /// Every acceptance, whatever became of it.
    pub total_accepted: u64,
    pub active: u64,
    pub completed: u64,
    pub cancelled: u64,
    /// Accepted prices of completed audits.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_earnings: Decimal,
}

/// Summarise the owners held by `wallet` (case-insensitive).
pub fn auditor_summary(owners: &[AuditOwner], wallet: &str) -> AuditorSummary {
    let mut summary = AuditorSummary {
        wallet: wallet.to_string(),
        ..Default::default()
    };
    for owner in owners
        .iter()
        .filter(|o| o.auditor_wallet.eq_ignore_ascii_case(wallet))
    {
        summary.total_accepted += 1;
        match owner.status {
            OwnerStatus::Accepted | OwnerStatus::InProgress => summary.active += 1,
            OwnerStatus::Completed => {
                summary.completed += 1;
                summary.total_earnings += owner.accepted_price;
            }
            OwnerStatus::Cancelled => summary.cancelled += 1,
        }
    }
    summary
}
