use super::{ok, ApiResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::router::AppState;
use am_03_lifecycle::{FindingInput, FindingUpdate};
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::Finding;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FindingsQuery {
    pub auditor: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    ApiQuery(query): ApiQuery<FindingsQuery>,
) -> ApiResult<Vec<Finding>> {
    let findings = state
        .lifecycle
        .list_findings(&request_id, query.auditor.as_deref())
        .await?;
    Ok(ok(findings))
}

pub async fn create(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    ApiJson(input): ApiJson<FindingInput>,
) -> ApiResult<Finding> {
    Ok(ok(state.lifecycle.create_finding(&request_id, input).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(finding_id): Path<String>,
    ApiQuery(query): ApiQuery<FindingsQuery>,
    ApiJson(update): ApiJson<FindingUpdate>,
) -> ApiResult<Finding> {
    let finding = state
        .lifecycle
        .update_finding(&finding_id, query.auditor.as_deref(), update)
        .await?;
    Ok(ok(finding))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(finding_id): Path<String>,
    ApiQuery(query): ApiQuery<FindingsQuery>,
) -> ApiResult<Value> {
    state
        .lifecycle
        .delete_finding(&finding_id, query.auditor.as_deref())
        .await?;
    Ok(ok(json!({ "id": finding_id, "deleted": true })))
}
