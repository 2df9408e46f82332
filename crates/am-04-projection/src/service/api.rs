//! MarketplaceQueryApi implementation.

use super::MarketplaceQueries;
use crate::domain::{
    ListingCriteria, ListingView, ProjectionError, QueryOutcome, VerificationView, Viewer,
};
use crate::ports::inbound::{AuditorDashboard, DeveloperDashboard, MarketplaceQueryApi};
use am_05_statistics::MarketplaceStats;
use async_trait::async_trait;
use tracing::warn;

/// Log and degrade.
fn outcome<T: Default>(query: &str, result: Result<T, am_01_persistence::StoreError>) -> QueryOutcome<T> {
    if let Err(e) = &result {
        warn!("[am-04] {} query degraded: {}", query, e);
    }
    QueryOutcome::from_result(result)
}

#[async_trait]
impl MarketplaceQueryApi for MarketplaceQueries {
    async fn marketplace_listing(
        &self,
        criteria: ListingCriteria,
        viewer_wallet: Option<&str>,
    ) -> QueryOutcome<Vec<ListingView>> {
        let viewer = Viewer::from_wallet(viewer_wallet);
        outcome("listing", self.listing(&criteria, &viewer).await)
    }

    async fn developer_dashboard(&self, wallet: &str) -> QueryOutcome<DeveloperDashboard> {
        outcome("developer dashboard", self.developer_view(wallet.trim()).await)
    }

    async fn auditor_dashboard(&self, wallet: &str) -> QueryOutcome<AuditorDashboard> {
        outcome("auditor dashboard", self.auditor_view(wallet.trim()).await)
    }

    async fn marketplace_stats(&self) -> QueryOutcome<MarketplaceStats> {
        outcome("stats", self.stats().await)
    }

    async fn verification(&self, request_id: &str) -> Result<VerificationView, ProjectionError> {
        self.verify(request_id).await
    }
}
