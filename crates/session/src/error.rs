use cliqa_core::error::CoreError;

/// Errors surfaced by the session and its bridge client.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Bridge request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The bridge answered with a non-2xx status code.
    #[error("Bridge responded with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The bridge answered with something that is not the expected JSON.
    #[error("Malformed bridge response: {0}")]
    Malformed(String),

    /// The bridge answered `{"status": "error"}`.
    #[error("Bridge error: {0}")]
    Remote(String),

    /// A collection could not be encoded for saving.
    #[error("Failed to encode blob: {0}")]
    Encode(#[from] serde_json::Error),

    /// Reading or writing the session slot failed.
    #[error("Session slot error: {0}")]
    Slot(#[from] std::io::Error),

    /// A domain rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The operation needs a logged-in user.
    #[error("No user is logged in")]
    NotLoggedIn,
}
