//! CLI configuration: thin wrapper around `thermo_config` shared types.
//!
//! Adds the resolution that respects `GlobalOpts` flag overrides
//! (--server, --insecure, --timeout) on top of a profile.

use std::time::Duration;

use thermo_core::{ThermostatConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use thermo_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ThermostatConfig` from the config file, profile, and CLI
/// overrides. Without a matching profile, `--server` alone is enough.
pub fn build_thermostat_config(global: &GlobalOpts) -> Result<ThermostatConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let mut profile = profile.clone();
        if let Some(ref server) = global.server {
            profile.server.clone_from(server);
        }
        if global.insecure {
            profile.insecure = Some(true);
        }
        if let Some(timeout) = global.timeout {
            profile.timeout = Some(timeout);
        }
        return Ok(thermo_config::profile_to_thermostat_config(&profile, &cfg.defaults)?);
    }

    // An explicitly named profile must exist.
    if global.profile.is_some() && global.server.is_none() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    let url_str = global.server.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let mut config = ThermostatConfig::new(url);
    if global.insecure || cfg.defaults.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    config.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));
    Ok(config)
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
