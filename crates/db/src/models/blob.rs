//! Row model for the `storage_blobs` table.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A stored collection. `id` is the storage key.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StorageBlob {
    pub id: String,
    pub content: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
