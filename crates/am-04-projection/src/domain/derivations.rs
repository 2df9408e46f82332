//! Derived display fields.
//!
//! Every function here is pure; "now" is always an argument.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{AuditStatus, Complexity};

const MS_PER_DAY: i64 = 86_400_000;

/// Audit scope tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditPackage {
    Quick,
    Standard,
    Deep,
}

impl AuditPackage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quick => "Quick",
            Self::Standard => "Standard",
            Self::Deep => "Deep",
        }
    }
}

/// `Deep` for critical or longer than two weeks, `Standard` for high or
/// longer than a week, `Quick` otherwise.
pub fn audit_package(complexity: Complexity, duration_days: u32) -> AuditPackage {
    if complexity == Complexity::Critical || duration_days > 14 {
        AuditPackage::Deep
    } else if complexity == Complexity::High || duration_days > 7 {
        AuditPackage::Standard
    } else {
        AuditPackage::Quick
    }
}

/// `"Overdue"` once `created_at + duration_days` has passed, otherwise the
/// whole days remaining rounded up: `"1 day"`, `"3 days"`.
///
/// A deadline past the representable date range still counts days.
pub fn deadline_label(created_at: DateTime<Utc>, duration_days: u32, now: DateTime<Utc>) -> String {
    let remaining = match created_at.checked_add_signed(Duration::days(i64::from(duration_days))) {
        Some(deadline) => deadline - now,
        None => Duration::days(i64::from(duration_days)) - (now - created_at),
    };
    if remaining < Duration::zero() {
        return "Overdue".to_string();
    }
    let remaining_ms = remaining.num_milliseconds();
    let days = (remaining_ms + MS_PER_DAY - 1) / MS_PER_DAY;
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

/// Base size per contract type label.
fn base_lines(contract_type: Option<&str>) -> u32 {
    match contract_type.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
        Some("token") => 200,
        Some("nft") => 400,
        Some("defi") => 800,
        Some("governance") => 600,
        Some("marketplace") => 1000,
        _ => 500,
    }
}

/// Rough size estimate. Never an actual count.
pub fn estimated_lines_of_code(contract_type: Option<&str>, complexity: Complexity) -> u32 {
    (f64::from(base_lines(contract_type)) * complexity.loc_multiplier()).floor() as u32
}

/// Completion percentage.
///
/// In-progress audits report elapsed time over the estimated duration,
/// clamped to 1..=99 so that only a completed audit shows 100.
pub fn progress(
    status: AuditStatus,
    started_at: DateTime<Utc>,
    duration_days: u32,
    now: DateTime<Utc>,
) -> u8 {
    match status {
        AuditStatus::Available | AuditStatus::Cancelled => 0,
        AuditStatus::Completed => 100,
        AuditStatus::InProgress => {
            let total_ms = i64::from(duration_days.max(1)) * MS_PER_DAY;
            let elapsed_ms = (now - started_at).num_milliseconds().max(0);
            let percent = elapsed_ms.saturating_mul(100) / total_ms;
            percent.clamp(1, 99) as u8
        }
    }
}
