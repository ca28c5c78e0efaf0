use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cliqa_db::StoreError;
use serde_json::json;

use crate::response::BridgeStatus;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce the bridge error envelope
/// `{"status": "error", "message": ..., "code": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A blob store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Store(err) => {
                tracing::error!(error = %err, "Blob store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "status": BridgeStatus::Error,
            "message": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
