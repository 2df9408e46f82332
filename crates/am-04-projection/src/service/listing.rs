use super::MarketplaceQueries;
use crate::domain::{apply_visibility, project_listing, ListingCriteria, ListingView, Viewer};
use am_01_persistence::StoreError;
use am_05_statistics::{compute_stats, MarketplaceStats};
use shared_types::AuditRequest;
use tracing::debug;

impl MarketplaceQueries {
    pub(crate) async fn listing(
        &self,
        criteria: &ListingCriteria,
        viewer: &Viewer,
    ) -> Result<Vec<ListingView>, StoreError> {
        let rows = self
            .repository
            .list_requests_with_joins(&criteria.store_filters())
            .await?;
        let fetched = rows.len();
        let rows: Vec<_> = rows
            .into_iter()
            .filter(|j| criteria.matches(&j.request))
            .collect();
        let visible = apply_visibility(rows, viewer);
        debug!(
            "[am-04] Listing: {} fetched, {} visible to {:?}",
            fetched,
            visible.len(),
            viewer
        );

        let now = self.clock.now();
        Ok(visible.iter().map(|j| project_listing(j, now)).collect())
    }

    pub(crate) async fn stats(&self) -> Result<MarketplaceStats, StoreError> {
        let requests: Vec<AuditRequest> = self.repository.list(&[]).await?;
        Ok(compute_stats(&requests))
    }
}
