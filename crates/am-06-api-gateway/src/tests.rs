//! Router tests driven through `tower::ServiceExt::oneshot`.

use crate::domain::GatewayConfig;
use crate::router::{build_router, AppState};
use am_01_persistence::{InMemoryStore, Repository};
use am_02_collaborators::{
    HeuristicCostEstimator, InMemoryEvidenceStorage, SimulatedNftMinter,
    StaticRepositoryAnalyzer, StubPaymentGateway,
};
use am_03_lifecycle::{AuditLifecycleService, LifecycleDependencies};
use am_04_projection::{MarketplaceQueries, QueryDependencies};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use shared_types::FixedClock;
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    store: Arc<InMemoryStore>,
}

fn app_with(config: GatewayConfig) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let repository = Repository::new(store.clone());
    let storage = Arc::new(InMemoryEvidenceStorage::new());
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    ));

    let lifecycle = AuditLifecycleService::new(LifecycleDependencies {
        repository: repository.clone(),
        storage: storage.clone(),
        minter: Arc::new(SimulatedNftMinter::new()),
        payments: Arc::new(StubPaymentGateway::new()),
        analyzer: Arc::new(StaticRepositoryAnalyzer::default()),
        estimator: Arc::new(HeuristicCostEstimator::default()),
        clock: clock.clone(),
    });
    let queries = MarketplaceQueries::new(QueryDependencies {
        repository: repository.clone(),
        storage,
        clock,
    });

    let state = AppState {
        lifecycle: Arc::new(lifecycle),
        queries: Arc::new(queries),
        repository,
    };
    TestApp {
        router: build_router(state, &config),
        store,
    }
}

fn app() -> TestApp {
    app_with(GatewayConfig::default())
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn submission() -> Value {
    json!({
        "projectName": "Vault",
        "description": "ERC-4626 vault",
        "repositoryUrl": "https://github.com/acme/vault",
        "complexity": "High",
        "proposedPrice": 3000,
        "estimatedDurationDays": 10,
        "developerWallet": "0xdev",
        "tags": ["defi"]
    })
}

fn acceptance(wallet: &str) -> Value {
    json!({
        "auditorWallet": wallet,
        "auditorName": "Auditor",
        "acceptedPrice": 2800,
        "estimatedDays": 5
    })
}

async fn submitted(app: &TestApp) -> String {
    let (status, body) = call(&app.router, Method::POST, "/api/audits", Some(submission())).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_reports_backend() {
    let app = app();
    let (status, body) = call(&app.router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_health_unavailable_backend_is_503() {
    let app = app();
    app.store.set_unavailable(true);
    let (status, body) = call(&app.router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_submit_and_fetch_use_envelope() {
    let app = app();
    let id = submitted(&app).await;

    let (status, body) = call(&app.router, Method::GET, &format!("/api/audits/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "Available");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_validation_failure_is_400_with_message() {
    let app = app();
    let mut input = submission();
    input["projectName"] = json!("");
    let (status, body) = call(&app.router, Method::POST, "/api/audits", Some(input)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("projectName"));
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_malformed_json_is_400_envelope() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/audits")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_missing_request_is_404() {
    let app = app();
    let (status, body) = call(&app.router, Method::GET, "/api/audits/req_missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_second_accept_is_409() {
    let app = app();
    let id = submitted(&app).await;
    let uri = format!("/api/audits/{id}/accept");

    let (first, body) = call(&app.router, Method::POST, &uri, Some(acceptance("0xaudA"))).await;
    assert_eq!(first, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "accepted");

    let (second, body) = call(&app.router, Method::POST, &uri, Some(acceptance("0xaudB"))).await;
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_cancel_without_body() {
    let app = app();
    let id = submitted(&app).await;
    let (status, body) =
        call(&app.router, Method::POST, &format!("/api/audits/{id}/cancel"), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "Cancelled");
}

#[tokio::test]
async fn test_full_flow_through_verification() {
    let app = app();
    let id = submitted(&app).await;

    let (_, accepted) = call(
        &app.router,
        Method::POST,
        &format!("/api/audits/{id}/accept"),
        Some(acceptance("0xaudA")),
    )
    .await;
    let owner_id = accepted["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &app.router,
        Method::POST,
        &format!("/api/owners/{owner_id}/start"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, finding) = call(
        &app.router,
        Method::POST,
        &format!("/api/audits/{id}/findings"),
        Some(json!({
            "auditorWallet": "0xaudA",
            "title": "Reentrancy",
            "description": "withdraw() reenters",
            "severity": "high",
            "category": "security"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{finding}");

    let (status, listed) = call(
        &app.router,
        Method::GET,
        &format!("/api/audits/{id}/findings?auditor=0xAUDA"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let (status, result) = call(
        &app.router,
        Method::POST,
        &format!("/api/owners/{owner_id}/results"),
        Some(json!({
            "findings": [{"title": "Reentrancy", "severity": "high"}],
            "notes": "one issue"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{result}");
    assert_eq!(result["data"]["severityBreakdown"]["high"], 1);

    let (status, verified) =
        call(&app.router, Method::GET, &format!("/api/verify/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["data"]["verified"], true);

    let (_, stats) = call(&app.router, Method::GET, "/api/stats", None).await;
    assert_eq!(stats["data"]["total"], 1);
    assert_eq!(stats["data"]["byStatus"]["Completed"], 1);
}

#[tokio::test]
async fn test_marketplace_hides_other_auditors_work() {
    let app = app();
    let id = submitted(&app).await;
    submitted(&app).await;
    call(
        &app.router,
        Method::POST,
        &format!("/api/audits/{id}/accept"),
        Some(acceptance("0xaudA")),
    )
    .await;

    let (_, anonymous) = call(&app.router, Method::GET, "/api/marketplace", None).await;
    assert_eq!(anonymous["data"].as_array().unwrap().len(), 1);

    let (_, owner) = call(&app.router, Method::GET, "/api/marketplace?wallet=0xaudA", None).await;
    assert_eq!(owner["data"].as_array().unwrap().len(), 2);

    let (_, other) = call(&app.router, Method::GET, "/api/marketplace?wallet=0xaudB", None).await;
    assert_eq!(other["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_marketplace_rejects_unknown_status() {
    let app = app();
    let (status, body) =
        call(&app.router, Method::GET, "/api/marketplace?status=Paused", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_degraded_listing_is_200_with_error() {
    let app = app();
    app.store.set_unavailable(true);
    let (status, body) = call(&app.router, Method::GET, "/api/marketplace", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_body_limit_enforced() {
    let mut config = GatewayConfig::default();
    config.limits.max_body_bytes = 64;
    let app = app_with(config);
    let (status, _) = call(&app.router, Method::POST, "/api/audits", Some(submission())).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = app();
    let (status, _) = call(&app.router, Method::GET, "/api/nothing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_endless_durations_are_400_and_listing_survives() {
    let app = app();
    let mut input = submission();
    input["estimatedDurationDays"] = json!(u32::MAX);
    let (status, body) = call(&app.router, Method::POST, "/api/audits", Some(input)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("estimatedDurationDays"));

    let id = submitted(&app).await;
    let mut endless = acceptance("0xaudA");
    endless["estimatedDays"] = json!(u32::MAX);
    let (status, body) = call(
        &app.router,
        Method::POST,
        &format!("/api/audits/{id}/accept"),
        Some(endless),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, listed) = call(&app.router, Method::GET, "/api/marketplace", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_finding_edits_are_scoped_and_frozen_after_results() {
    let app = app();
    let id = submitted(&app).await;
    let (_, accepted) = call(
        &app.router,
        Method::POST,
        &format!("/api/audits/{id}/accept"),
        Some(acceptance("0xaudA")),
    )
    .await;
    let owner_id = accepted["data"]["id"].as_str().unwrap().to_string();

    let (_, created) = call(
        &app.router,
        Method::POST,
        &format!("/api/audits/{id}/findings"),
        Some(json!({
            "auditorWallet": "0xaudA",
            "title": "Reentrancy",
            "description": "withdraw() reenters",
            "severity": "high",
            "category": "security"
        })),
    )
    .await;
    let finding_id = created["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/findings/{finding_id}");

    let (status, _) = call(
        &app.router,
        Method::PUT,
        &format!("{uri}?auditor=0xaudB"),
        Some(json!({"severity": "low"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, updated) = call(
        &app.router,
        Method::PUT,
        &format!("{uri}?auditor=0xaudA"),
        Some(json!({"severity": "critical"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["data"]["severity"], "critical");

    call(
        &app.router,
        Method::POST,
        &format!("/api/owners/{owner_id}/results"),
        Some(json!({"findings": []})),
    )
    .await;

    let (status, body) = call(&app.router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}
