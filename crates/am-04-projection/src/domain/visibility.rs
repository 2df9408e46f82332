//! Role-aware row visibility.
//!
//! Applied after the join: "non-available rows owned by the caller" depends
//! on the owner table, so it cannot be a single filter on requests.

use am_01_persistence::JoinedRequest;
use shared_types::AuditStatus;

/// Who is looking at a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    Auditor { wallet: String },
}

impl Viewer {
    /// Blank or absent wallets are anonymous.
    pub fn from_wallet(wallet: Option<&str>) -> Self {
        match wallet.map(str::trim).filter(|w| !w.is_empty()) {
            Some(wallet) => Self::Auditor {
                wallet: wallet.to_string(),
            },
            None => Self::Anonymous,
        }
    }
}

/// Available rows for everyone, plus an auditor's own claimed rows.
pub fn is_visible(joined: &JoinedRequest, viewer: &Viewer) -> bool {
    if joined.request.status == AuditStatus::Available {
        return true;
    }
    match viewer {
        Viewer::Anonymous => false,
        Viewer::Auditor { wallet } => joined
            .owner_wallet()
            .is_some_and(|owner| owner.eq_ignore_ascii_case(wallet)),
    }
}

pub fn apply_visibility(rows: Vec<JoinedRequest>, viewer: &Viewer) -> Vec<JoinedRequest> {
    rows.into_iter().filter(|j| is_visible(j, viewer)).collect()
}
