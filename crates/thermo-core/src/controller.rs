// ── Thermostat controller ──
//
// Lifecycle for one scheduler server: summary loading, periodic refresh,
// override mutations, and handing out schedule editing sessions.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use thermo_api::models::OverrideForm;
use thermo_api::{SchedulerClient, TlsMode, TransportConfig};

use crate::config::{ThermostatConfig, TlsVerification};
use crate::convert;
use crate::editor::ScheduleEditor;
use crate::error::CoreError;
use crate::model::{ClearScope, OverrideRequest, OverrideState, Summary, ZoneId, ZoneInfo};
use crate::store::DataStore;
use crate::stream::SnapshotStream;

// ── Thermostat ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ThermostatInner>`.
#[derive(Clone)]
pub struct Thermostat {
    inner: Arc<ThermostatInner>,
}

struct ThermostatInner {
    config: ThermostatConfig,
    client: SchedulerClient,
    store: Arc<DataStore>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Thermostat {
    /// Build the HTTP client for `config`. Does not talk to the server;
    /// call [`start()`](Self::start) for that.
    pub fn new(config: ThermostatConfig) -> Result<Self, CoreError> {
        let client = SchedulerClient::new(&config.url, &build_transport(&config))?;
        Ok(Self {
            inner: Arc::new(ThermostatInner {
                config,
                client,
                store: Arc::new(DataStore::new()),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &ThermostatConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Load the first summary and spawn the periodic refresh, if enabled.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.refresh_summary().await?;

        let interval_secs = self.inner.config.refresh_interval_secs;
        if interval_secs > 0 {
            let this = self.clone();
            let cancel = self.inner.cancel.clone();
            self.inner
                .task_handles
                .lock()
                .await
                .push(tokio::spawn(refresh_task(this, interval_secs, cancel)));
        }

        info!(url = %self.inner.config.url, "thermostat started");
        Ok(())
    }

    /// Stop background work and cancel every open editing session.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("thermostat shut down");
    }

    /// Fetch the summary and replace the cached zones, overrides and
    /// today's schedule with it.
    pub async fn refresh_summary(&self) -> Result<(), CoreError> {
        let response = self.inner.client.get_summary().await?;
        let summary = convert::summary_from_wire(&response, Local::now().naive_local())?;
        self.inner.store.apply_summary(summary);
        Ok(())
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// Start without periodic refresh, run `f`, shut down.
    pub async fn oneshot<F, Fut, T>(config: ThermostatConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Thermostat) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.refresh_interval_secs = 0;

        let thermostat = Thermostat::new(cfg)?;
        thermostat.start().await?;
        let result = f(thermostat.clone()).await;
        thermostat.shutdown().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    pub fn summary(&self) -> Arc<Summary> {
        self.inner.store.summary_snapshot()
    }

    pub fn subscribe_summary(&self) -> SnapshotStream<Summary> {
        self.inner.store.subscribe_summary()
    }

    pub fn override_state(&self, zone: ZoneId) -> OverrideState {
        self.inner.store.override_state(zone)
    }

    pub async fn list_zones(&self) -> Result<Vec<ZoneInfo>, CoreError> {
        let zones = self.inner.client.list_zones().await?;
        Ok(zones.into_iter().map(ZoneInfo::from).collect())
    }

    // ── Overrides ────────────────────────────────────────────────

    /// Override one zone for `request.hours` from now.
    ///
    /// On failure the cached state is left alone. A duration whose end
    /// falls off the calendar is rejected before anything is sent.
    pub async fn set_override(&self, request: OverrideRequest) -> Result<OverrideState, CoreError> {
        request.until_from(Local::now().naive_local())?;
        let form = OverrideForm {
            hours: request.hours,
            temp: request.temp.celsius(),
            zone: request.zone.get(),
        };
        self.inner.client.set_target_override(&form).await?;

        let until = request.until_from(Local::now().naive_local())?;
        let state = OverrideState::Overridden { until };
        self.inner.store.set_override_state(request.zone, state);
        info!(zone = %request.zone, temp = %request.temp, %until, "override set");

        self.refresh_after_mutation().await;
        Ok(state)
    }

    pub async fn clear_override(&self, scope: ClearScope) -> Result<(), CoreError> {
        match scope {
            ClearScope::All => self.inner.client.clear_target_override().await?,
            ClearScope::Zone(zone) => self.inner.client.clear_zone_override(zone.get()).await?,
        }
        self.inner.store.clear_overrides(scope);
        info!(?scope, "override cleared");

        self.refresh_after_mutation().await;
        Ok(())
    }

    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.refresh_summary().await {
            warn!(error = %e, "summary refresh after override change failed");
        }
    }

    // ── Schedule editing ─────────────────────────────────────────

    /// Open an editing session over a freshly fetched weekly schedule.
    ///
    /// The session ends when it is closed, dropped, or the thermostat shuts
    /// down.
    pub async fn edit_schedule(&self) -> Result<ScheduleEditor, CoreError> {
        ScheduleEditor::open(self.inner.client.clone(), self.inner.cancel.child_token()).await
    }
}

// ── Background tasks ─────────────────────────────────────────────

async fn refresh_task(thermostat: Thermostat, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = thermostat.refresh_summary().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_transport(config: &ThermostatConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
