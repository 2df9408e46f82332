//! Route table and middleware stack.

use crate::domain::GatewayConfig;
use crate::handlers::{audits, findings, health, queries};
use crate::middleware::create_cors_layer;
use am_01_persistence::Repository;
use am_03_lifecycle::AuditLifecycleApi;
use am_04_projection::MarketplaceQueryApi;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<dyn AuditLifecycleApi>,
    pub queries: Arc<dyn MarketplaceQueryApi>,
    /// Health checks only; handlers go through the two APIs above.
    pub repository: Repository,
}

pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(&config.cors))
        .layer(TimeoutLayer::new(config.timeouts.request));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/estimate", post(audits::estimate))
        .route("/api/audits", post(audits::submit))
        .route("/api/audits/:id", get(audits::get_one))
        .route("/api/audits/:id/accept", post(audits::accept))
        .route("/api/audits/:id/cancel", post(audits::cancel))
        .route(
            "/api/audits/:id/findings",
            get(findings::list).post(findings::create),
        )
        .route("/api/owners/:id/start", post(audits::start))
        .route("/api/owners/:id/results", post(audits::submit_results))
        .route(
            "/api/findings/:id",
            put(findings::update).delete(findings::delete),
        )
        .route("/api/marketplace", get(queries::marketplace))
        .route("/api/stats", get(queries::stats))
        .route("/api/verify/:id", get(queries::verify))
        .route(
            "/api/dashboard/developer/:wallet",
            get(queries::developer_dashboard),
        )
        .route(
            "/api/dashboard/auditor/:wallet",
            get(queries::auditor_dashboard),
        )
        .route(
            "/api/developers/:wallet/refresh",
            post(audits::refresh_developer),
        )
        .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
        .layer(middleware)
        .with_state(state)
}
