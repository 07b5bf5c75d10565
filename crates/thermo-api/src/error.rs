use thiserror::Error;

/// Top-level error type for the `thermo-api` crate.
///
/// Covers every failure mode of the scheduler web API: transport,
/// rejected input, unexpected statuses and malformed payloads.
/// `thermo-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server responses ────────────────────────────────────────────
    /// The server rejected the submitted form (HTTP 400).
    #[error("Request rejected by server: {path}")]
    Validation { path: String, body: String },

    /// The requested resource does not exist (HTTP 404).
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Any other non-success status.
    #[error("Unexpected HTTP {status} from {path}")]
    Status {
        status: u16,
        path: String,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request never completed (connect failure or timeout).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if the server rejected the input as malformed.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::NotFound { .. } => true,
            _ => false,
        }
    }

    /// HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Validation { .. } => Some(400),
            Self::NotFound { .. } => Some(404),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
