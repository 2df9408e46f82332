//! Route handlers, one file per resource.

pub mod audits;
pub mod findings;
pub mod health;
pub mod queries;

use crate::domain::ApiResponse;
use axum::Json;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, crate::domain::ApiError>;

pub(crate) fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}
