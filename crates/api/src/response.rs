//! Response envelopes of the persistence bridge.
//!
//! Clients branch on the `status` field, so every non-`load_all` answer
//! carries one.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeStatus {
    Success,
    Error,
    Idle,
}

/// `{"status": "success", "key": ...}` after a save.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub status: BridgeStatus,
    pub key: String,
}

impl SaveResponse {
    pub fn success(key: String) -> Self {
        Self {
            status: BridgeStatus::Success,
            key,
        }
    }
}

/// Bare `{"status": ...}` answer.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: BridgeStatus,
}

impl StatusResponse {
    pub fn idle() -> Self {
        Self {
            status: BridgeStatus::Idle,
        }
    }
}
