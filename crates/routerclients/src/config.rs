//! CLI configuration: thin wrapper around `routerclients_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--host,
//! --transport, --password, ...) on top of the selected profile.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use routerclients_config::ConfigError;
use routerclients_core::RouterConfig;

use crate::cli::{GlobalOpts, OutputFormat, StoreArgs};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use routerclients_config::{Config, Profile, config_path, load_config};

/// Everything a fetch needs, resolved from config + flags.
#[derive(Debug)]
pub struct Resolved {
    pub router: RouterConfig,
    pub store_path: PathBuf,
    pub poll_interval: Duration,
    pub output: OutputFormat,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config
        .active_profile_name(global.profile.as_deref())
        .to_owned()
}

/// `--output` when given, otherwise `defaults.output` from the config file.
pub fn output_format(
    flag: Option<&OutputFormat>,
    configured: &str,
) -> Result<OutputFormat, CliError> {
    if let Some(format) = flag {
        return Ok(format.clone());
    }
    OutputFormat::from_str(configured, true).map_err(|_| CliError::Validation {
        field: "defaults.output".into(),
        reason: format!("unknown output format '{configured}'"),
    })
}

/// Pick the profile, apply flag overrides and build a `RouterConfig`.
///
/// Without a matching profile, `--host` alone is enough to start from an
/// empty profile; the strategy then reports whatever else is missing.
pub fn resolve(global: &GlobalOpts, store: &StoreArgs) -> Result<Resolved, CliError> {
    let cfg = load_config()?;
    let output = output_format(global.output.as_ref(), &cfg.defaults.output)?;

    let (name, mut profile) = match cfg.profile(global.profile.as_deref()) {
        Ok((name, profile)) => (name.to_owned(), profile.clone()),
        Err(ConfigError::UnknownProfile { name }) if global.host.is_some() => {
            (name, Profile::default())
        }
        Err(ConfigError::UnknownProfile { name }) if global.profile.is_some() => {
            let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        Err(ConfigError::UnknownProfile { .. }) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    apply_overrides(&mut profile, global, store);

    let mut router = routerclients_config::profile_to_router_config(&profile, &name, &cfg.defaults)?;
    if let Some(ref password) = global.password {
        router.password = Some(SecretString::from(password.clone()));
    }
    if let Some(window) = store.recency_window {
        router.recency_window = window;
    }

    Ok(Resolved {
        router,
        store_path: routerclients_config::store_path(&profile),
        poll_interval: Duration::from_secs(cfg.defaults.poll_interval_secs),
        output,
    })
}

/// CLI flag overrides take priority over profile values.
fn apply_overrides(profile: &mut Profile, global: &GlobalOpts, store: &StoreArgs) {
    if let Some(ref host) = global.host {
        profile.host = Some(host.clone());
    }
    if let Some(ref transport) = global.transport {
        profile.transport.clone_from(transport);
    }
    if let Some(port) = global.port {
        profile.port = Some(port);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if store.persist {
        profile.persist = Some(true);
    }
    if let Some(ref path) = store.store {
        profile.store_path = Some(path.clone());
    }
}
