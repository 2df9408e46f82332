//! Extractors whose rejections use the API envelope.

use crate::domain::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON body; malformed input is a 400 with the envelope body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string; malformed input is a 400 with the envelope body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
