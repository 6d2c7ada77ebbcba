#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use euit_api::config::ServerConfig;
use euit_api::router::build_app_router;
use euit_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:3000` as the only CORS origin and short
/// transport timeouts.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        heartbeat_interval_secs: 15,
        client_timeout_secs: 30,
        send_timeout_ms: 1000,
        outbound_buffer: 16,
    }
}

/// Fresh state plus the router built on top of it.
///
/// The state is returned so tests can attach hub connections directly and
/// observe what the HTTP layer delivers to them.
pub fn build_test_app() -> (AppState, Router) {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> (AppState, Router) {
    let state = AppState::new(config.clone());
    let app = build_app_router(state.clone(), &config);
    (state, app)
}

/// Serve the full router on an ephemeral port.
pub async fn spawn_server() -> (AppState, SocketAddr) {
    spawn_server_with(test_config()).await
}

pub async fn spawn_server_with(config: ServerConfig) -> (AppState, SocketAddr) {
    let (state, app) = build_test_app_with(config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (state, addr)
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<String>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
