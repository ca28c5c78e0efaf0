//! Drives the HTTP bridge client against the real bridge router.

use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;

use cliqa_api::config::ServerConfig;
use cliqa_api::router::build_app_router;
use cliqa_api::state::AppState;
use cliqa_db::{BlobStore, MemoryBlobStore};
use cliqa_session::{HttpBridge, PersistenceBridge, SessionError};

async fn spawn_bridge() -> (String, Arc<MemoryBlobStore>) {
    let store = Arc::new(MemoryBlobStore::new());
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        max_key_length: 100,
    };
    let state = AppState {
        store: store.clone(),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/api"), store)
}

#[tokio::test]
async fn save_then_load_all_over_http() {
    let (url, store) = spawn_bridge().await;
    let bridge = HttpBridge::with_client(reqwest::Client::new(), url);

    assert!(bridge.load_all().await.unwrap().is_empty());

    bridge
        .save("cliqa_clients", &json!([{ "id": "c1", "name": "Acme" }]))
        .await
        .unwrap();

    let all = bridge.load_all().await.unwrap();
    assert_eq!(all["cliqa_clients"][0]["name"], "Acme");
    assert!(store.load_all().await.unwrap().contains_key("cliqa_clients"));
}

#[tokio::test]
async fn rejected_save_surfaces_as_http_error() {
    let (url, _store) = spawn_bridge().await;
    let bridge = HttpBridge::with_client(reqwest::Client::new(), url);

    assert_matches!(
        bridge.save("", &json!([])).await,
        Err(SessionError::Http { status: 400, .. })
    );
    assert_matches!(
        bridge.save("cliqa_users", &serde_json::Value::Null).await,
        Err(SessionError::Http { status: 400, .. })
    );
}

#[tokio::test]
async fn unreachable_bridge_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let bridge = HttpBridge::with_client(reqwest::Client::new(), format!("http://{addr}/api"));
    assert_matches!(bridge.load_all().await, Err(SessionError::Transport(_)));
}
