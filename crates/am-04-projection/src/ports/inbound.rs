//! # Inbound Ports
//!
//! Query API of the view assembly subsystem.

use crate::domain::{
    DashboardCardView, ListingCriteria, ListingView, ProjectionError, QueryOutcome,
    VerificationView,
};
use am_05_statistics::{AuditorSummary, MarketplaceStats};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{Developer, SeverityBreakdown};

/// Everything a developer dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperDashboard {
    pub cards: Vec<DashboardCardView>,
    pub stats: MarketplaceStats,
    pub profile: Option<Developer>,
}

/// Everything an auditor dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditorDashboard {
    pub cards: Vec<DashboardCardView>,
    pub summary: AuditorSummary,
    pub severity_totals: SeverityBreakdown,
}

/// Marketplace query API - inbound port.
///
/// Listing, dashboard and statistics queries never fail: a backend error
/// yields empty data plus a message.
#[async_trait]
pub trait MarketplaceQueryApi: Send + Sync {
    /// Listing filtered by `criteria` and by what `viewer_wallet` may see.
    async fn marketplace_listing(
        &self,
        criteria: ListingCriteria,
        viewer_wallet: Option<&str>,
    ) -> QueryOutcome<Vec<ListingView>>;

    async fn developer_dashboard(&self, wallet: &str) -> QueryOutcome<DeveloperDashboard>;

    async fn auditor_dashboard(&self, wallet: &str) -> QueryOutcome<AuditorDashboard>;

    async fn marketplace_stats(&self) -> QueryOutcome<MarketplaceStats>;

    /// Public verification payload. Evidence fetch failures surface as
    /// `ipfsError`, never as an error.
    async fn verification(&self, request_id: &str) -> Result<VerificationView, ProjectionError>;
}
