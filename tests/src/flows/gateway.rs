//! # Gateway Flow
//!
//! The runtime's own wiring (`SubsystemContainer` over the default memory
//! backend) behind the real router, exercised over HTTP requests.

#[cfg(test)]
mod tests {
    use am_06_api_gateway::{build_router, GatewayConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use node_runtime::{NodeConfig, SubsystemContainer};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn router() -> Router {
        let container = SubsystemContainer::new(NodeConfig::default()).await.unwrap();
        build_router(container.app_state(), &GatewayConfig::default())
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
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
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_audit_round_trip_over_http() {
        let router = router().await;

        let (status, estimate) = send(
            &router,
            Method::POST,
            "/api/estimate",
            Some(json!({
                "repositoryUrl": "https://github.com/acme/amm",
                "codeSample": "function swap() external { }"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{estimate}");
        assert_eq!(estimate["success"], true);

        let (status, created) = send(
            &router,
            Method::POST,
            "/api/audits",
            Some(json!({
                "projectName": "AMM",
                "description": "Constant product pool",
                "repositoryUrl": "https://github.com/acme/amm",
                "complexity": "Low",
                "proposedPrice": 900,
                "estimatedDurationDays": 4,
                "developerWallet": "0xdev",
                "contract": {"name": "Pool", "contractType": "DEX"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{created}");
        let request_id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, owner) = send(
            &router,
            Method::POST,
            &format!("/api/audits/{request_id}/accept"),
            Some(json!({
                "auditorWallet": "0xaud",
                "auditorName": "Auditor",
                "acceptedPrice": 850,
                "estimatedDays": 3
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{owner}");
        let owner_id = owner["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = send(&router, Method::POST, &format!("/api/owners/{owner_id}/start"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, dashboard) = send(&router, Method::GET, "/api/dashboard/auditor/0xaud", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dashboard["data"]["cards"].as_array().unwrap().len(), 1);

        let (status, result) = send(
            &router,
            Method::POST,
            &format!("/api/owners/{owner_id}/results"),
            Some(json!({
                "findings": [{"title": "Rounding", "severity": "medium"}],
                "evidenceFiles": [{"name": "poc.txt", "bytes": [112, 111, 99]}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{result}");
        assert_eq!(result["data"]["findingsCount"], 1);

        let (status, verified) = send(&router, Method::GET, &format!("/api/verify/{request_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(verified["data"]["verified"], true);
        assert_eq!(verified["data"]["evidenceHashes"].as_array().unwrap().len(), 1);

        let (status, developer) = send(&router, Method::GET, "/api/dashboard/developer/0xdev", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(developer["data"]["cards"][0]["status"], "Completed");
        assert_eq!(developer["data"]["profile"]["totalProjects"], 1);

        // Completed work is gone from the anonymous marketplace.
        let (_, listing) = send(&router, Method::GET, "/api/marketplace", None).await;
        assert_eq!(listing["data"], json!([]));
    }

    #[tokio::test]
    async fn test_conflicts_and_missing_resources_use_envelope() {
        let router = router().await;

        let (status, body) = send(&router, Method::POST, "/api/owners/own_missing/start", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());

        let (status, body) = send(&router, Method::DELETE, "/api/findings/fnd_missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let (status, body) = send(&router, Method::GET, "/api/verify/req_missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_health_over_runtime_wiring() {
        let router = router().await;
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["backend"], "memory");
    }
}
