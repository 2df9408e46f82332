//! Lifecycle mutations and single-request reads.

use super::{ok, ApiResult};
use crate::extract::ApiJson;
use crate::router::AppState;
use am_03_lifecycle::{
    AcceptAuditInput, CancelAuditInput, SubmissionEstimate, SubmitAuditInput, SubmitResultsInput,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use shared_types::{AuditOwner, AuditRequest, AuditResult, Developer};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimateBody {
    pub repository_url: String,
    pub code_sample: String,
}

pub async fn estimate(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<EstimateBody>,
) -> ApiResult<SubmissionEstimate> {
    let estimate = state
        .lifecycle
        .estimate_submission(&body.repository_url, &body.code_sample)
        .await?;
    Ok(ok(estimate))
}

pub async fn submit(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SubmitAuditInput>,
) -> Result<(StatusCode, Json<crate::domain::ApiResponse<AuditRequest>>), crate::domain::ApiError> {
    let request = state.lifecycle.submit_audit_request(input).await?;
    Ok((StatusCode::CREATED, ok(request)))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<AuditRequest> {
    Ok(ok(state.lifecycle.get_audit_request(&id).await?))
}

pub async fn accept(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<AcceptAuditInput>,
) -> ApiResult<AuditOwner> {
    Ok(ok(state.lifecycle.accept_audit_request(&id, input).await?))
}

/// The body is optional; `{}` and no body both cancel without a reason.
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<ApiJson<CancelAuditInput>>,
) -> ApiResult<AuditRequest> {
    let input = body.map(|ApiJson(input)| input).unwrap_or_default();
    Ok(ok(state.lifecycle.cancel_audit_request(&id, input).await?))
}

pub async fn start(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> ApiResult<AuditOwner> {
    Ok(ok(state.lifecycle.start_audit(&owner_id).await?))
}

pub async fn submit_results(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    ApiJson(input): ApiJson<SubmitResultsInput>,
) -> ApiResult<AuditResult> {
    Ok(ok(state.lifecycle.submit_audit_results(&owner_id, input).await?))
}

pub async fn refresh_developer(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> ApiResult<Developer> {
    Ok(ok(state.lifecycle.refresh_developer_profile(&wallet).await?))
}
