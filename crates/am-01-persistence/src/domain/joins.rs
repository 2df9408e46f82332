//! # Joined Request
//!
//! An audit request together with the records that point at it.

use serde::{Deserialize, Serialize};
use shared_types::{AuditOwner, AuditRequest, AuditResult, IpfsRecord, NftRecord, SmartContract};

/// Relationship-following read of one audit request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRequest {
    pub request: AuditRequest,
    /// The active owner if any, else the most recent one.
    pub owner: Option<AuditOwner>,
    pub result: Option<AuditResult>,
    pub contract: Option<SmartContract>,
    pub nft: Option<NftRecord>,
    pub ipfs: Option<IpfsRecord>,
}

impl JoinedRequest {
    pub fn bare(request: AuditRequest) -> Self {
        Self {
            request,
            owner: None,
            result: None,
            contract: None,
            nft: None,
            ipfs: None,
        }
    }

    /// Wallet of the joined owner, if any.
    pub fn owner_wallet(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.auditor_wallet.as_str())
    }
}

/// Pick the owner to show for a request.
///
/// An active owner wins; otherwise the most recently created one.
pub fn select_owner(mut owners: Vec<AuditOwner>) -> Option<AuditOwner> {
    owners.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let active = owners.iter().position(|o| o.status.is_active());
    match active {
        Some(index) => Some(owners.swap_remove(index)),
        None => owners.into_iter().next(),
    }
}
