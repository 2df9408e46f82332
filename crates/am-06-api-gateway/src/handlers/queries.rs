//! Read-side endpoints. Listing and dashboard queries answer 200 even when
//! the backend fails, with empty data and an `error` field.

use super::{ok, ApiResult};
use crate::domain::{ApiError, ApiResponse};
use crate::extract::ApiQuery;
use crate::router::AppState;
use am_04_projection::{
    AuditorDashboard, DeveloperDashboard, ListingCriteria, ListingView, QueryOutcome,
    VerificationView,
};
use axum::extract::{Path, State};
use axum::Json;
use am_05_statistics::MarketplaceStats;
use serde::Deserialize;
use shared_types::{AuditStatus, Complexity};

fn degraded<T>(outcome: QueryOutcome<T>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::degraded(outcome.data, outcome.error))
}

/// `GET /api/marketplace` parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MarketplaceQuery {
    /// Caller's wallet; absent means anonymous.
    pub wallet: Option<String>,
    pub status: Option<String>,
    pub complexity: Option<String>,
    pub tag: Option<String>,
    pub developer: Option<String>,
    pub q: Option<String>,
}

impl MarketplaceQuery {
    fn criteria(&self) -> Result<ListingCriteria, ApiError> {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<AuditStatus>)
            .transpose()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        let complexity = self
            .complexity
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<Complexity>)
            .transpose()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        Ok(ListingCriteria {
            status,
            complexity,
            tag: self.tag.clone(),
            developer_wallet: self.developer.clone(),
            search: self.q.clone(),
        })
    }
}

pub async fn marketplace(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MarketplaceQuery>,
) -> Result<Json<ApiResponse<Vec<ListingView>>>, ApiError> {
    let criteria = query.criteria()?;
    let outcome = state
        .queries
        .marketplace_listing(criteria, query.wallet.as_deref())
        .await;
    Ok(degraded(outcome))
}

pub async fn developer_dashboard(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Json<ApiResponse<DeveloperDashboard>> {
    degraded(state.queries.developer_dashboard(&wallet).await)
}

pub async fn auditor_dashboard(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Json<ApiResponse<AuditorDashboard>> {
    degraded(state.queries.auditor_dashboard(&wallet).await)
}

pub async fn stats(State(state): State<AppState>) -> Json<ApiResponse<MarketplaceStats>> {
    degraded(state.queries.marketplace_stats().await)
}

pub async fn verify(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<VerificationView> {
    Ok(ok(state.queries.verification(&id).await?))
}
