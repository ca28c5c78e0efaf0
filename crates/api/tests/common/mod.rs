#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use cliqa_db::{BlobStore, MemoryBlobStore};
use http_body_util::BodyExt;
use tower::ServiceExt;

use cliqa_api::config::ServerConfig;
use cliqa_api::router::build_app_router;
use cliqa_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Allows any CORS origin (the production default) and keeps the 100
/// character key limit.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        max_key_length: 100,
    }
}

/// Build the full application router over the given store.
///
/// Uses the same `build_app_router` as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app_with(store: Arc<dyn BlobStore>, config: ServerConfig) -> Router {
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Build the app over a fresh in-memory store, returning both.
pub fn build_test_app() -> (Router, Arc<MemoryBlobStore>) {
    let store = Arc::new(MemoryBlobStore::new());
    let app = build_test_app_with(store.clone(), test_config());
    (app, store)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, json.to_string()).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
