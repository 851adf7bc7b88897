//! Configuration for the gwnly CLI.
//!
//! TOML profiles, app secret resolution (env + keyring + plaintext), and
//! translation to `gwnly_api::Credentials`. The CLI layers its global flag
//! overrides on top of this.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use gwnly_api::{Credentials, DEFAULT_SERVER_URL, TlsMode, TransportConfig};

/// Keyring service name; entries are keyed `{profile}/app-secret`.
pub const KEYRING_SERVICE: &str = "gwnly";

/// Prefix for environment overrides (`GWN_DEFAULTS__OUTPUT=json`).
pub const ENV_PREFIX: &str = "GWN_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no app secret configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

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
    /// Name of the active profile: explicit choice, then `default_profile`,
    /// then `"default"`.
    pub fn profile_name<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Seconds between cycles in `watch` mode.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_poll_interval() -> u64 {
    10
}

/// A named GWN server profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Cloud region or self-hosted GWN Manager URL.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Open API application id.
    pub app_id: String,

    /// App secret (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_secret: Option<String>,

    /// Environment variable holding the app secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_secret_env: Option<String>,

    /// Custom CA certificate for self-hosted installs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Accept any TLS certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.into()
}

impl Profile {
    pub fn new(server_url: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            app_id: app_id.into(),
            app_secret: None,
            app_secret_env: None,
            ca_cert: None,
            insecure: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "gwnly", "gwnly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("gwnly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + environment. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
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

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/app-secret"))
}

/// Resolve the app secret: profile's `app_secret_env`, then the system
/// keyring, then the plaintext `app_secret`.
pub fn resolve_app_secret(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's app_secret_env → env var lookup
    if let Some(val) = profile
        .app_secret_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
        .filter(|v| !v.is_empty())
    {
        debug!(profile = profile_name, "app secret from environment");
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if let Some(secret) = keyring_entry(profile_name)
        .ok()
        .and_then(|entry| entry.get_password().ok())
    {
        debug!(profile = profile_name, "app secret from keyring");
        return Ok(SecretString::from(secret));
    }

    // 3. Plaintext in config
    if let Some(secret) = profile.app_secret.as_ref().filter(|s| !s.is_empty()) {
        return Ok(SecretString::from(secret.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store the app secret in the system keyring.
pub fn store_app_secret(profile_name: &str, secret: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(secret)?;
    Ok(())
}

/// Parse and check a server URL (`http` or `https`, with a host).
pub fn parse_server_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: "server_url".into(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(format!("{e}: {raw}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid(format!("missing host: {raw}")));
    }
    Ok(url)
}

/// Build API credentials from a profile, no CLI flag overrides.
pub fn profile_to_credentials(profile: &Profile, profile_name: &str) -> Result<Credentials, ConfigError> {
    if profile.app_id.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "app_id".into(),
            reason: "must not be empty".into(),
        });
    }
    let base_url = parse_server_url(&profile.server_url)?;
    let secret = resolve_app_secret(profile, profile_name)?;
    Ok(Credentials::new(profile.app_id.trim(), secret, base_url))
}

/// TLS settings for a profile.
pub fn profile_transport(profile: &Profile) -> TransportConfig {
    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };
    TransportConfig {
        tls,
        ..TransportConfig::default()
    }
}

/// Poll interval from the defaults table, never below one second.
pub fn poll_interval(cfg: &Config) -> Duration {
    Duration::from_secs(cfg.defaults.poll_interval.max(1))
}
