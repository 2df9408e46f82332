//! Developer profile recomputation.

use super::AuditLifecycleService;
use crate::domain::{developer_profile, LifecycleError};
use am_01_persistence::Filter;
use shared_types::{fields, AuditOwner, AuditRequest, Developer};
use tracing::debug;

impl AuditLifecycleService {
    pub(crate) async fn refresh_profile(&self, wallet: &str) -> Result<Developer, LifecycleError> {
        let wallet = wallet.trim();
        if wallet.is_empty() {
            return Err(LifecycleError::validation("wallet is required"));
        }

        let requests: Vec<AuditRequest> = self
            .repository
            .list(&[Filter::eq_ignore_case(fields::DEVELOPER_WALLET, wallet)])
            .await?;
        let ids: Vec<String> = requests.iter().map(|r| r.id.clone()).collect();
        let owners: Vec<AuditOwner> = self.repository.list_for_requests(&ids).await?;
        let previous: Option<Developer> = self.repository.get(wallet).await?;

        let profile = developer_profile(wallet, &requests, &owners, previous.as_ref(), self.now());
        let profile = self.repository.upsert(&profile).await?;
        debug!(
            "[am-03] Profile {}: {} projects, reputation {}",
            wallet, profile.total_projects, profile.reputation_score
        );
        Ok(profile)
    }
}
