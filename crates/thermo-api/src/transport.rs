// HTTP client construction
//
// Scheduler servers often run on a home network behind a self-signed
// certificate, so the TLS trust choice travels with the request timeout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

/// Which certificates the client trusts.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Platform roots.
    System,
    /// Roots from a PEM file, in addition to the platform roots.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-signed home servers).
    DangerAcceptInvalid,
}

/// Settings for every request a [`SchedulerClient`](crate::SchedulerClient) sends.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("thermo/", env!("CARGO_PKG_VERSION")));

        let builder = match &self.tls {
            TlsMode::System => builder,
            TlsMode::CustomCa(path) => builder.add_root_certificate(read_ca(path)?),
            TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        builder
            .build()
            .map_err(|e| Error::Tls(format!("could not create HTTP client: {e}")))
    }
}

fn read_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("cannot read {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("{} is not a PEM certificate: {e}", path.display())))
}
