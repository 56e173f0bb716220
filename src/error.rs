//! Error types shared by the portal clients and the pipeline.

use thiserror::Error;

/// Failure of a single HTTP exchange with a portal.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network/connection error (includes timeouts)
    #[error("network error: {0}")]
    Network(String),
    /// HTTP error (non-2xx status)
    #[error("HTTP error: {0}")]
    Http(u16),
    /// Body could not be decoded
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Network("connection timeout - server did not respond".to_string())
        } else if e.is_connect() {
            FetchError::Network("connection failed - server unreachable".to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Errors surfaced to callers of the playlist pipeline.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("no portal found at {host} ({attempted} base paths tried)")]
    PortalNotFound { host: String, attempted: usize },

    #[error("handshake with {host} failed: no token from any of {attempted} base paths")]
    Auth { host: String, attempted: usize },

    #[error("malformed {what} response")]
    Protocol {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("upstream {what} request failed")]
    Upstream {
        what: &'static str,
        #[source]
        source: FetchError,
    },

    #[error("no channels survived filtering")]
    EmptyResult,

    #[error("invalid playlist: {0}")]
    InvalidPlaylist(String),

    #[error("failed to create HTTP client")]
    Client(#[source] reqwest::Error),
}
