//! Route definitions for the persistence bridge.

use axum::routing::get;
use axum::Router;

use crate::handlers::bridge;
use crate::state::AppState;

/// Bridge routes mounted at the root.
///
/// ```text
/// GET   /api?action=load_all   -> every stored blob keyed by storage key
/// POST  /api?action=save       -> replace one blob ({"key", "data"})
/// *     /api                   -> {"status": "idle"}
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api",
        get(bridge::dispatch_get)
            .post(bridge::dispatch_post)
            .fallback(bridge::idle),
    )
}
