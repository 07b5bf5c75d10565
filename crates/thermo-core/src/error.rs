// ── Core error types ──
//
// User-facing errors from thermo-core. Consumers never see reqwest errors
// or HTTP statuses directly: the `From<thermo_api::Error>` impl folds
// transport failures into the network / validation / API taxonomy.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Network ──────────────────────────────────────────────────────
    #[error("Request to {url} did not complete: {reason}")]
    NetworkFailure { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── Input / server validation ────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Local schedule state ─────────────────────────────────────────
    #[error("No schedule entry at {when}")]
    EntryNotFound { when: String },

    #[error("A schedule entry already exists at {when}")]
    Conflict { when: String },

    #[error("Unknown zone {zone}")]
    ZoneNotFound { zone: i64 },

    #[error("Editing session was closed before the operation completed")]
    Cancelled,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The request never reached (or never came back from) the server.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkFailure { .. } | Self::Timeout { .. })
    }

    /// Input was rejected, locally or by the server.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<thermo_api::Error> for CoreError {
    fn from(err: thermo_api::Error) -> Self {
        match err {
            thermo_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else if e.is_connect() || e.is_request() {
                    CoreError::NetworkFailure {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            thermo_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            thermo_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            thermo_api::Error::Validation { path, body } => CoreError::ValidationFailed {
                message: if body.is_empty() {
                    format!("server rejected request to {path}")
                } else {
                    format!("server rejected request to {path}: {body}")
                },
            },
            thermo_api::Error::NotFound { path } => CoreError::Api {
                message: format!("{path} not found"),
                status: Some(404),
            },
            thermo_api::Error::Status { status, path, .. } => CoreError::Api {
                message: format!("unexpected response from {path}"),
                status: Some(status),
            },
            thermo_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
