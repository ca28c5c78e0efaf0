//! Key-value blob storage backends.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::repositories::BlobRepo;
use crate::DbPool;

/// Whole-value storage of named JSON blobs. Writes overwrite
/// unconditionally.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Every stored blob keyed by storage key.
    async fn load_all(&self) -> Result<Map<String, Value>, StoreError>;

    /// Replace the blob stored under `key`.
    async fn save(&self, key: &str, data: &Value) -> Result<(), StoreError>;

    /// Whether the backend is reachable.
    async fn health(&self) -> bool;
}

pub struct PgBlobStore {
    pool: DbPool,
}

impl PgBlobStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlobStore for PgBlobStore {
    async fn load_all(&self) -> Result<Map<String, Value>, StoreError> {
        let rows = BlobRepo::list_all(&self.pool).await?;
        Ok(rows.into_iter().map(|row| (row.id, row.content)).collect())
    }

    async fn save(&self, key: &str, data: &Value) -> Result<(), StoreError> {
        let row = BlobRepo::upsert(&self.pool, key, data).await?;
        tracing::debug!(key = %row.id, updated_at = %row.updated_at, "Blob stored");
        Ok(())
    }

    async fn health(&self) -> bool {
        crate::health_check(&self.pool).await.is_ok()
    }
}

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<BTreeMap<String, Value>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn load_all(&self) -> Result<Map<String, Value>, StoreError> {
        let blobs = self.blobs.read().await;
        Ok(blobs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    async fn save(&self, key: &str, data: &Value) -> Result<(), StoreError> {
        self.blobs.write().await.insert(key.to_string(), data.clone());
        Ok(())
    }

    async fn health(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn memory_store_starts_empty() {
        let store = MemoryBlobStore::new();
        assert!(store.load_all().await.unwrap().is_empty());
        assert!(store.health().await);
    }

    #[tokio::test]
    async fn memory_store_last_write_wins() {
        let store = MemoryBlobStore::new();
        store.save("cliqa_clients", &json!([{"id": "a"}])).await.unwrap();
        store.save("cliqa_clients", &json!([])).await.unwrap();
        store.save("cliqa_config", &json!({"agencyName": "CliqA"})).await.unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["cliqa_clients"], json!([]));
        assert_eq!(all["cliqa_config"]["agencyName"], "CliqA");
    }
}
