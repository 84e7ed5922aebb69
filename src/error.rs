use thiserror::Error;

/// Startup failures. A process that hits one of these must not serve traffic.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SPOTIPY_CLIENT_ID or SPOTIPY_CLIENT_SECRET environment variable not set.")]
    MissingCredentials,
}

/// Failures of a single playlist lookup.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Spotify answered with an error status (bad id, no access, ...).
    /// Displays as the upstream message alone; `status` is kept for logging.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// Everything else: network faults, timeouts, token failures, bad payloads.
    #[error("{0}")]
    Internal(String),
}

impl FetchError {
    pub fn internal(msg: impl std::fmt::Display) -> Self {
        FetchError::Internal(msg.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Internal(format!("unexpected response shape: {}", e))
    }
}
