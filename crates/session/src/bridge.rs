//! Clients of the persistence bridge.
//!
//! The bridge speaks JSON over HTTP with two actions: `load_all` returns
//! every stored blob keyed by storage key, `save` replaces one blob. Either
//! may answer `{"status": "error", "message": ...}` instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

use crate::config::SessionConfig;
use crate::error::SessionError;

#[async_trait]
pub trait PersistenceBridge: Send + Sync {
    /// Every stored blob keyed by storage key.
    async fn load_all(&self) -> Result<Map<String, Value>, SessionError>;

    /// Replace the blob stored under `key` with `data`.
    async fn save(&self, key: &str, data: &Value) -> Result<(), SessionError>;
}

/// Bridge reached over HTTP.
pub struct HttpBridge {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBridge {
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.bridge_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.bridge_url.clone()))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    // ---- private helpers ----

    /// Read a JSON body, rejecting non-2xx statuses, unparseable text and the
    /// bridge's error envelope.
    async fn read_json(response: reqwest::Response) -> Result<Value, SessionError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(SessionError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: Value = serde_json::from_str(text.trim())
            .map_err(|e| SessionError::Malformed(format!("{e}: {}", truncate(&text))))?;

        if value.get("status").and_then(Value::as_str) == Some("error") {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(SessionError::Remote(message));
        }
        Ok(value)
    }
}

fn truncate(text: &str) -> String {
    const MAX: usize = 200;
    if text.chars().count() > MAX {
        format!("{}...", text.chars().take(MAX).collect::<String>())
    } else {
        text.to_string()
    }
}

#[async_trait]
impl PersistenceBridge for HttpBridge {
    async fn load_all(&self) -> Result<Map<String, Value>, SessionError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("action", "load_all")])
            .send()
            .await?;

        match Self::read_json(response).await? {
            Value::Object(blobs) => Ok(blobs),
            other => Err(SessionError::Malformed(format!(
                "expected an object of blobs, got {other}"
            ))),
        }
    }

    async fn save(&self, key: &str, data: &Value) -> Result<(), SessionError> {
        let response = self
            .client
            .post(&self.base_url)
            .query(&[("action", "save")])
            .json(&json!({ "key": key, "data": data }))
            .send()
            .await?;

        let value = Self::read_json(response).await?;
        match value.get("status").and_then(Value::as_str) {
            Some("success") => Ok(()),
            _ => Err(SessionError::Malformed(format!("unexpected save response: {value}"))),
        }
    }
}

/// In-process bridge backed by a map. Can be switched offline to make every
/// call fail.
#[derive(Default)]
pub struct MemoryBridge {
    blobs: Mutex<Map<String, Value>>,
    offline: AtomicBool,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blobs(blobs: Map<String, Value>) -> Self {
        Self {
            blobs: Mutex::new(blobs),
            ..Self::default()
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Current value stored under `key`.
    pub async fn blob(&self, key: &str) -> Option<Value> {
        self.blobs.lock().await.get(key).cloned()
    }

    fn check_online(&self) -> Result<(), SessionError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SessionError::Remote("bridge is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceBridge for MemoryBridge {
    async fn load_all(&self) -> Result<Map<String, Value>, SessionError> {
        self.check_online()?;
        Ok(self.blobs.lock().await.clone())
    }

    async fn save(&self, key: &str, data: &Value) -> Result<(), SessionError> {
        self.check_online()?;
        self.blobs.lock().await.insert(key.to_string(), data.clone());
        Ok(())
    }
}
