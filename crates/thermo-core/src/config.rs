// ── Runtime connection configuration ──
//
// Describes *how* to reach the scheduler web server. Never touches disk:
// the CLI resolves profiles and flags into a `ThermostatConfig`.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed home servers).
    DangerAcceptInvalid,
}

/// Configuration for talking to one scheduler server.
#[derive(Debug, Clone)]
pub struct ThermostatConfig {
    /// Server URL (e.g., `http://boiler.local:5000`). The API lives under `api/`.
    pub url: Url,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// How often to re-fetch the summary (seconds). 0 = never.
    pub refresh_interval_secs: u64,
}

impl ThermostatConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            refresh_interval_secs: 0,
        }
    }
}
