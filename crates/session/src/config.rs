use std::path::PathBuf;

/// Session configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the persistence bridge, without query string.
    pub bridge_url: String,
    /// File holding the authenticated user between launches.
    pub session_file: PathBuf,
    /// Per-request timeout for bridge calls.
    pub bridge_timeout_secs: u64,
}

impl SessionConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                     |
    /// |-----------------------|-----------------------------|
    /// | `BRIDGE_URL`          | `http://localhost:3000/api` |
    /// | `SESSION_FILE`        | `.cliqa_session.json`       |
    /// | `BRIDGE_TIMEOUT_SECS` | `30`                        |
    pub fn from_env() -> Self {
        let bridge_url =
            std::env::var("BRIDGE_URL").unwrap_or_else(|_| "http://localhost:3000/api".into());

        let session_file = std::env::var("SESSION_FILE")
            .unwrap_or_else(|_| ".cliqa_session.json".into())
            .into();

        let bridge_timeout_secs: u64 = std::env::var("BRIDGE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("BRIDGE_TIMEOUT_SECS must be a valid u64");

        Self {
            bridge_url,
            session_file,
            bridge_timeout_secs,
        }
    }
}
