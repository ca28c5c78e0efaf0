use std::sync::Arc;

use cliqa_db::BlobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Backing blob store (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn BlobStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
