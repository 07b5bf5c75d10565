//! Shared configuration for the thermo CLI.
//!
//! TOML profiles naming scheduler servers, loaded through figment
//! (defaults, then the config file, then `THERMO_*` environment variables)
//! and translated to `thermo_core::ThermostatConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use thermo_core::{ThermostatConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── File format ─────────────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between summary refreshes for long-running consumers.
    #[serde(default)]
    pub refresh_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            refresh_interval: 0,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named scheduler server profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Scheduler web server base URL (e.g., "http://boiler.local:5000").
    pub server: String,

    /// PEM bundle to trust instead of the system roots.
    pub ca_cert: Option<PathBuf>,

    /// Skip certificate checks (self-signed scheduler).
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override refresh interval.
    pub refresh_interval: Option<u64>,
}

impl Profile {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            refresh_interval: None,
        }
    }
}

// ── Location ────────────────────────────────────────────────────────

/// `config.toml` in the platform config dir (`$XDG_CONFIG_HOME/thermo` on Linux).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "boilerio", "thermo").map_or_else(
        || {
            let mut p = home_config_dir();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn home_config_dir() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("thermo");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment. A missing file yields
/// the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("THERMO_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Saving ──────────────────────────────────────────────────────────

/// Write `cfg` to [`config_path`], returning where it went.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to runtime config ───────────────────────────────────

/// Build a `ThermostatConfig` from a profile, falling back to `defaults`
/// for anything the profile leaves unset.
pub fn profile_to_thermostat_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ThermostatConfig, ConfigError> {
    let url: url::Url = profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ThermostatConfig::new(url);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.refresh_interval_secs = profile.refresh_interval.unwrap_or(defaults.refresh_interval);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut profile = Profile::new("http://boiler.local:5000");
        profile.timeout = Some(5);
        cfg.profiles.insert("default".into(), profile);
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let (name, profile) = loaded.profile(None).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.server, "http://boiler.local:5000");
        assert_eq!(profile.timeout, Some(5));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile(Some("upstairs")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn profile_overrides_defaults() {
        let defaults = Defaults {
            insecure: true,
            refresh_interval: 60,
            ..Defaults::default()
        };
        let mut profile = Profile::new("https://boiler.local");
        profile.insecure = Some(false);
        profile.ca_cert = Some(PathBuf::from("/etc/ssl/boiler.pem"));

        let config = profile_to_thermostat_config(&profile, &defaults).unwrap();

        assert_eq!(config.tls, TlsVerification::CustomCa("/etc/ssl/boiler.pem".into()));
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn bad_server_url_is_rejected() {
        let err = profile_to_thermostat_config(&Profile::new("not a url"), &Defaults::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "server"));
    }
}
