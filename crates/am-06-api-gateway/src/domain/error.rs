//! Boundary error type.
//!
//! Every subsystem error becomes an [`ApiError`]: an HTTP status plus a
//! message safe to show the caller.
//!
//! | Source | Status |
//! |--------|--------|
//! | Validation, malformed JSON | 400 |
//! | NotFound | 404 |
//! | State | 409 |
//! | Upstream, Persistence | 500 |
//! | BackendUnavailable | 503 |

use super::envelope::ApiResponse;
use am_03_lifecycle::LifecycleError;
use am_04_projection::ProjectionError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        let status = match &err {
            LifecycleError::Validation(_) => StatusCode::BAD_REQUEST,
            LifecycleError::NotFound { .. } => StatusCode::NOT_FOUND,
            LifecycleError::State(_) => StatusCode::CONFLICT,
            LifecycleError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            LifecycleError::Upstream { .. } | LifecycleError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        let status = match &err {
            ProjectionError::NotFound(_) => StatusCode::NOT_FOUND,
            ProjectionError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ProjectionError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(format!("invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("[am-06] {} {}", self.status, self.message);
        } else {
            debug!("[am-06] {} {}", self.status, self.message);
        }
        (self.status, Json(ApiResponse::<()>::failure(self.message))).into_response()
    }
}

/// Failures starting or running the server.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("server bind error: {0}")]
    Bind(String),

    #[error("server error: {0}")]
    Serve(String),
}
