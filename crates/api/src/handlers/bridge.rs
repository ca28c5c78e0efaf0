//! Handlers for the persistence bridge.
//!
//! The bridge is a single endpoint dispatched on the `action` query
//! parameter. `load_all` returns every stored blob keyed by storage key;
//! `save` replaces one blob wholesale. Anything else answers `idle`.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use cliqa_core::store::StorageKey;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::response::{SaveResponse, StatusResponse};
use crate::state::AppState;

pub const ACTION_LOAD_ALL: &str = "load_all";
pub const ACTION_SAVE: &str = "save";

#[derive(Debug, Deserialize)]
pub struct ActionQuery {
    pub action: Option<String>,
}

/// Body of a `save` request. `data` may be any JSON value except `null`.
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// GET /api?action=...
pub async fn dispatch_get(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
) -> AppResult<Response> {
    match query.action.as_deref() {
        Some(ACTION_LOAD_ALL) => load_all(&state).await.map(IntoResponse::into_response),
        _ => Ok(idle().await.into_response()),
    }
}

/// POST /api?action=...
pub async fn dispatch_post(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
    body: Bytes,
) -> AppResult<Response> {
    match query.action.as_deref() {
        Some(ACTION_SAVE) => {
            let request: SaveRequest = serde_json::from_slice(&body)
                .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;
            save(&state, request).await.map(IntoResponse::into_response)
        }
        _ => Ok(idle().await.into_response()),
    }
}

/// Any other method, or an unknown action.
pub async fn idle() -> Json<StatusResponse> {
    Json(StatusResponse::idle())
}

async fn load_all(state: &AppState) -> AppResult<Json<serde_json::Map<String, Value>>> {
    let blobs = state.store.load_all().await?;
    tracing::debug!(count = blobs.len(), "Loaded all blobs");
    Ok(Json(blobs))
}

async fn save(state: &AppState, request: SaveRequest) -> AppResult<Json<SaveResponse>> {
    let key = request
        .key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("key is required".into()))?;

    let max = state.config.max_key_length;
    if key.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "key must be at most {max} characters"
        )));
    }

    if StorageKey::parse(&key).is_none() {
        tracing::warn!(key = %key, "Saving blob under an unrecognized key");
    }

    let data = request
        .data
        .ok_or_else(|| AppError::BadRequest("data is required".into()))?;

    state.store.save(&key, &data).await?;
    tracing::info!(key = %key, "Blob saved");

    Ok(Json(SaveResponse::success(key)))
}
