//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a distinct exit code per failure class.

use miette::Diagnostic;
use thiserror::Error;

use thermo_config::ConfigError;
use thermo_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const PARTIAL: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the scheduler at {url}")]
    #[diagnostic(
        code(thermo::connection_failed),
        help(
            "Check that the scheduler web server is running and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(thermo::timeout),
        help("Increase the timeout with --timeout or check the server's responsiveness.")
    )]
    Timeout { url: String },

    // ── Schedule ─────────────────────────────────────────────────────

    #[error("No schedule entry at {when}")]
    #[diagnostic(
        code(thermo::not_found),
        help("Run: thermo schedule show --day <DAY> to see the day's entries")
    )]
    EntryNotFound { when: String },

    #[error("Zone {zone} not found")]
    #[diagnostic(code(thermo::zone_not_found), help("Run: thermo zones to list zones"))]
    ZoneNotFound { zone: i64 },

    #[error("A schedule entry already exists at {when}")]
    #[diagnostic(
        code(thermo::conflict),
        help("Remove it first with: thermo schedule remove --day <DAY> --time {when}")
    )]
    Conflict { when: String },

    #[error("Entry at {when} was only saved for some zones; failed: {zones}")]
    #[diagnostic(
        code(thermo::partial_save),
        help("Re-add the failed zones, or reload the schedule to see what the server kept.")
    )]
    PartialSave { when: String, zones: String },

    #[error("Operation was cancelled")]
    #[diagnostic(code(thermo::cancelled))]
    Cancelled,

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(thermo::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(thermo::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(thermo::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: thermo --server <URL> config init --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Profile '{name}' already exists")]
    #[diagnostic(code(thermo::profile_exists), help("Pass --force to replace it."))]
    ProfileExists { name: String },

    #[error("No scheduler server configured")]
    #[diagnostic(
        code(thermo::no_config),
        help(
            "Pass --server <URL>, set THERMO_SERVER, or create a profile with:\n\
             thermo --server <URL> config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(thermo::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(thermo::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode config: {0}")]
    #[diagnostic(code(thermo::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::EntryNotFound { .. } | Self::ZoneNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } | Self::ProfileExists { .. } => exit_code::CONFLICT,
            Self::PartialSave { .. } => exit_code::PARTIAL,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NetworkFailure { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { url } => CliError::Timeout { url },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::EntryNotFound { when } => CliError::EntryNotFound { when },

            CoreError::Conflict { when } => CliError::Conflict { when },

            CoreError::ZoneNotFound { zone } => CliError::ZoneNotFound { zone },

            CoreError::Cancelled => CliError::Cancelled,

            CoreError::Api { message, status } => CliError::ApiError { status, message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                status: None,
                message,
            },
        }
    }
}
