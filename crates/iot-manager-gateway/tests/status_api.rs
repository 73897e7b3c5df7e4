//! Integration tests for the internal status API and unmatched routes.

mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{router, router_with_config, Call, StubApp, TestRequest};
use iot_manager_gateway::GatewayConfig;

const ALIVE: &str = "/api/internal/v1/iot-manager/alive";
const HEALTH: &str = "/api/internal/v1/iot-manager/health";

#[tokio::test]
async fn alive_needs_no_backend() {
    let app = StubApp::new();
    let response = TestRequest::get(ALIVE).send(&router(&app)).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_empty());
    assert!(app.calls().is_empty());
}

#[tokio::test]
async fn health_ok() {
    let app = StubApp::new();
    let response = TestRequest::get(HEALTH).send(&router(&app)).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(app.calls(), vec![Call::HealthCheck]);
}

#[tokio::test]
async fn health_failure_is_unavailable() {
    let app = StubApp::new();
    app.fail_with("twin service unavailable");

    let response = TestRequest::get(HEALTH)
        .request_id("req-health")
        .send(&router(&app))
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json(),
        json!({
            "error": "device twin backend error: twin service unavailable",
            "request_id": "req-health"
        })
    );
}

#[tokio::test(start_paused = true)]
async fn health_times_out() {
    let app = StubApp::new();
    app.delay_health(Duration::from_secs(60));

    let response = TestRequest::get(HEALTH).send(&router(&app)).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.envelope().error, "health check timed out");
    assert!(app.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn health_timeout_is_configurable() {
    let app = StubApp::new();
    app.delay_health(Duration::from_secs(5));

    let config = GatewayConfig {
        health_timeout_seconds: 2,
        ..GatewayConfig::default()
    };
    let response = TestRequest::get(HEALTH)
        .send(&router_with_config(&app, config))
        .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);

    let response = TestRequest::get(HEALTH).send(&router(&app)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unmatched_path_is_not_found() {
    let app = StubApp::new();
    let response = TestRequest::get("/api/internal/v1/iot-manager/ready")
        .request_id("req-404")
        .send(&router(&app))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.request_id.as_deref(), Some("req-404"));
    assert_eq!(
        response.json(),
        json!({"error": "not found", "request_id": "req-404"})
    );
}

#[tokio::test]
async fn unmatched_path_without_request_id_gets_generated_one() {
    let app = StubApp::new();
    let response = TestRequest::get("/").send(&router(&app)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let envelope = response.envelope();
    assert!(!envelope.request_id.is_empty());
    assert_eq!(response.request_id, Some(envelope.request_id));
}

#[tokio::test]
async fn wrong_method_on_internal_path_is_not_found() {
    let app = StubApp::new();
    let response = TestRequest::new(Method::POST, ALIVE)
        .request_id("req-post")
        .send(&router(&app))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.envelope().request_id, "req-post");
}
