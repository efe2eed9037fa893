//! The `hello` flavour: pod identity page and its health check.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use podview::config::{GatewayConfig, ServiceMode};
use podview::host::StaticEnvironment;
use podview::server::{router, AppState};

fn hello_app(env: StaticEnvironment) -> Router {
    let config = GatewayConfig::default().with_mode(ServiceMode::Hello);
    router(AppState::new(config, Arc::new(env)).unwrap())
}

async fn get(app: &Router, path: &str) -> (StatusCode, String) {
    let resp = app
        .clone()
        .oneshot(Request::builder().method("GET").uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn root_shows_pod_identity() {
    let app = hello_app(StaticEnvironment::new("web-6d4cf56db6-x2x9k"));
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Hello from Kubernetes!"));
    assert!(body.contains("web-6d4cf56db6-x2x9k"));
    assert!(body.contains("v1.0"));
}

#[tokio::test]
async fn root_uses_configured_version() {
    let app = hello_app(StaticEnvironment::new("pod").with_var("APP_VERSION", "v2.1"));
    let (_, body) = get(&app, "/").await;
    assert!(body.contains("v2.1"));
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = hello_app(StaticEnvironment::new("pod"));
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let v: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v, serde_json::json!({"status": "healthy"}));
}

#[tokio::test]
async fn gateway_routes_are_absent() {
    let app = hello_app(StaticEnvironment::new("pod"));
    let (status, _) = get(&app, "/login").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/dashboard").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
