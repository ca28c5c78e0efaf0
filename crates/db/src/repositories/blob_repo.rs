//! Repository for the `storage_blobs` table.

use sqlx::PgPool;

use crate::models::blob::StorageBlob;

/// Column list for `storage_blobs` queries.
const COLUMNS: &str = "id, content, updated_at";

/// Whole-value reads and writes of stored collections.
pub struct BlobRepo;

impl BlobRepo {
    /// Every stored blob, ordered by key.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<StorageBlob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM storage_blobs ORDER BY id");
        sqlx::query_as::<_, StorageBlob>(&query).fetch_all(pool).await
    }

    pub async fn find(pool: &PgPool, key: &str) -> Result<Option<StorageBlob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM storage_blobs WHERE id = $1");
        sqlx::query_as::<_, StorageBlob>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the blob stored under `key`.
    ///
    /// Uses `ON CONFLICT (id) DO UPDATE` so the last writer wins.
    pub async fn upsert(
        pool: &PgPool,
        key: &str,
        content: &serde_json::Value,
    ) -> Result<StorageBlob, sqlx::Error> {
        let query = format!(
            "INSERT INTO storage_blobs (id, content) \
             VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE \
             SET content = EXCLUDED.content, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StorageBlob>(&query)
            .bind(key)
            .bind(content)
            .fetch_one(pool)
            .await
    }
}
