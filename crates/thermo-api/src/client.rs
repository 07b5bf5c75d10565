// Scheduler web API HTTP client
//
// Wraps `reqwest::Client` with URL construction under the server's `api/`
// prefix, form-encoded mutations and status checking. Endpoint groups
// (schedule, overrides, summary) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the heating scheduler web API.
///
/// Every endpoint lives under `{server}/api/`. Mutations are sent as
/// `application/x-www-form-urlencoded` bodies and return no payload;
/// reads return JSON.
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    http: reqwest::Client,
    api_base: Url,
}

impl SchedulerClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `server_url` is the web root of the scheduler (the page that hosts
    /// the app), e.g. `http://thermostat.local/`. The `api/` prefix is
    /// appended here.
    pub fn new(server_url: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, server_url)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, server_url: &Url) -> Result<Self, Error> {
        let api_base = api_base(server_url)?;
        Ok(Self { http, api_base })
    }

    /// The resolved `api/` base URL.
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path, e.g. `schedule/new_entry`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.api_base.join(path)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let resp = check_status(resp).await?;
        let body = resp.text().await?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Send a form-encoded POST request, discarding the (empty) body.
    pub(crate) async fn post_form(&self, url: Url, form: &impl Serialize) -> Result<(), Error> {
        debug!("POST {}", url);

        let resp = self.http.post(url).form(form).send().await?;
        check_status(resp).await?;
        Ok(())
    }

    /// Send a DELETE request, discarding the (empty) body.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);

        let resp = self.http.delete(url).send().await?;
        check_status(resp).await?;
        Ok(())
    }
}

/// Normalise the server URL to a directory and append `api/`.
fn api_base(server_url: &Url) -> Result<Url, Error> {
    let mut root = server_url.clone();
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    Ok(root.join("api/")?)
}

/// Map non-success statuses onto typed errors.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let path = resp.url().path().to_owned();
    let body = resp.text().await.unwrap_or_default();

    Err(match status {
        reqwest::StatusCode::BAD_REQUEST => Error::Validation { path, body },
        reqwest::StatusCode::NOT_FOUND => Error::NotFound { path },
        _ => Error::Status {
            status: status.as_u16(),
            path,
            body,
        },
    })
}
