//! Configuration for the routerclients tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `routerclients_core::RouterConfig`.

use std::collections::HashMap;
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

use routerclients_core::{RouterConfig, RouterFamily, TlsVerification, Transport};

/// Keyring service name; entries are keyed `<profile>/password`.
pub const KEYRING_SERVICE: &str = "routerclients";

const ENV_PREFIX: &str = "ROUTERCLIENTS_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named router profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// `requested`, else `default_profile`, else `"default"`.
    pub fn active_profile_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = self.active_profile_name(name);
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Output format used when `--output` is not given.
    #[serde(default = "default_output")]
    pub output: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_recency_window")]
    pub recency_window_secs: u64,

    #[serde(default)]
    pub persist: bool,

    /// Seconds between snapshots in `watch` mode.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            recency_window_secs: default_recency_window(),
            persist: false,
            poll_interval_secs: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_recency_window() -> u64 {
    60 * 60 * 24
}
fn default_poll_interval() -> u64 {
    60
}

/// A named router profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Router family. Only "asus" is known.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// "ssh", "http" or "https".
    #[serde(default = "default_transport")]
    pub transport: String,

    pub host: Option<String>,

    /// Defaults to the transport's standard port for http/https.
    pub port: Option<u16>,

    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Inline SSH private key.
    pub private_key: Option<String>,

    pub private_key_path: Option<PathBuf>,

    /// Path to custom CA certificate (https only).
    pub ca_cert: Option<PathBuf>,

    /// Accept self-signed certificates. On unless a CA is configured.
    pub insecure: Option<bool>,

    pub timeout: Option<u64>,

    pub recency_window_secs: Option<u64>,

    /// Flush the first-seen store after every fetch.
    pub persist: Option<bool>,

    /// Override the first-seen store location.
    pub store_path: Option<PathBuf>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            transport: default_transport(),
            host: None,
            port: None,
            username: None,
            password: None,
            password_env: None,
            private_key: None,
            private_key_path: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            recency_window_secs: None,
            persist: None,
            store_path: None,
        }
    }
}

fn default_provider() -> String {
    "asus".into()
}
fn default_transport() -> String {
    "http".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "routerclients", "routerclients")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("routerclients");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default first-seen store location: `data/seen.json` under the data dir.
pub fn default_store_path() -> PathBuf {
    project_dirs()
        .map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf())
        .join("data")
        .join("seen.json")
}

/// Store location for `profile`, falling back to [`default_store_path`].
pub fn store_path(profile: &Profile) -> PathBuf {
    profile
        .store_path
        .clone()
        .unwrap_or_else(default_store_path)
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields defaults.
///
/// Environment keys nest with a double underscore, e.g.
/// `ROUTERCLIENTS_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

/// Resolve the router password: `password_env` → keyring → plaintext.
///
/// `None` is not an error here; the strategy decides whether it needs one.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Some(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    profile
        .password
        .as_ref()
        .map(|pw| SecretString::from(pw.clone()))
}

/// Store a password in the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let keyring_err = |e: keyring::Error| ConfigError::Validation {
        field: "keyring".into(),
        reason: e.to_string(),
    };
    keyring_entry(profile_name)
        .and_then(|entry| entry.set_password(password))
        .map_err(keyring_err)
}

// ── RouterConfig construction ───────────────────────────────────────

/// Build a `RouterConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_router_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<RouterConfig, ConfigError> {
    let provider: RouterFamily =
        profile
            .provider
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "provider".into(),
                reason: format!("expected 'asus', got '{}'", profile.provider),
            })?;

    let transport: Transport =
        profile
            .transport
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "transport".into(),
                reason: format!(
                    "expected 'ssh', 'http', or 'https', got '{}'",
                    profile.transport
                ),
            })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else if profile.insecure == Some(false) {
        TlsVerification::SystemDefaults
    } else {
        TlsVerification::DangerAcceptInvalid
    };

    Ok(RouterConfig {
        provider,
        transport,
        host: profile.host.clone(),
        port: profile.port,
        username: profile.username.clone(),
        password: resolve_password(profile, profile_name),
        private_key: profile
            .private_key
            .as_ref()
            .map(|key| SecretString::from(key.clone())),
        private_key_path: profile.private_key_path.clone(),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        recency_window: Duration::from_secs(
            profile
                .recency_window_secs
                .unwrap_or(defaults.recency_window_secs),
        ),
        persist: profile.persist.unwrap_or(defaults.persist),
    })
}
