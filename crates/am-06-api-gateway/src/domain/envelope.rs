use serde::{Deserialize, Serialize};

/// Uniform response body: `{ "success": true, "data": … }` or
/// `{ "success": false, "error": "…" }`.
///
/// Degraded queries carry both `data` and `error` with `success: true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn degraded(data: T, error: Option<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
