use super::MarketplaceQueries;
use crate::domain::project_dashboard_card;
use crate::ports::inbound::{AuditorDashboard, DeveloperDashboard};
use am_01_persistence::{Filter, StoreError};
use am_05_statistics::{auditor_summary, compute_stats, severity_totals};
use shared_types::{fields, AuditOwner, AuditResult, Developer};
use std::collections::BTreeSet;

impl MarketplaceQueries {
    pub(crate) async fn developer_view(
        &self,
        wallet: &str,
    ) -> Result<DeveloperDashboard, StoreError> {
        let rows = self
            .repository
            .list_requests_with_joins(&[Filter::eq_ignore_case(fields::DEVELOPER_WALLET, wallet)])
            .await?;
        let profile: Option<Developer> = self.repository.get(wallet).await?;

        let now = self.clock.now();
        let requests: Vec<_> = rows.iter().map(|j| j.request.clone()).collect();
        Ok(DeveloperDashboard {
            cards: rows.iter().map(|j| project_dashboard_card(j, now)).collect(),
            stats: compute_stats(&requests),
            profile,
        })
    }

    pub(crate) async fn auditor_view(&self, wallet: &str) -> Result<AuditorDashboard, StoreError> {
        let owners: Vec<AuditOwner> = self
            .repository
            .list(&[Filter::eq_ignore_case(fields::AUDITOR_WALLET, wallet)])
            .await?;
        let summary = auditor_summary(&owners, wallet);
        if owners.is_empty() {
            return Ok(AuditorDashboard {
                summary,
                ..Default::default()
            });
        }

        let request_ids: BTreeSet<&str> = owners.iter().map(|o| o.audit_request_id.as_str()).collect();
        let rows = self
            .repository
            .list_requests_with_joins(&[Filter::any_of(fields::ID, request_ids)])
            .await?;
        let mine: Vec<_> = rows
            .into_iter()
            .filter(|j| j.owner_wallet().is_some_and(|w| w.eq_ignore_ascii_case(wallet)))
            .collect();

        let results: Vec<AuditResult> = mine.iter().filter_map(|j| j.result.clone()).collect();
        let now = self.clock.now();
        Ok(AuditorDashboard {
            cards: mine.iter().map(|j| project_dashboard_card(j, now)).collect(),
            summary,
            severity_totals: severity_totals(&results),
        })
    }
}
