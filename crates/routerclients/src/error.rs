//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a distinct exit code per failure class.

use miette::Diagnostic;
use thiserror::Error;

use routerclients_config::ConfigError;
use routerclients_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to router at {host}")]
    #[diagnostic(
        code(routerclients::connection_failed),
        help(
            "{reason}\n\
             Check the address, port and credentials.\n\
             Self-signed HTTPS routers need --insecure (-k) or `insecure = true`."
        )
    )]
    ConnectionFailed { host: String, reason: String },

    // ── Acquisition ──────────────────────────────────────────────────
    #[error("Failed to read {step} from the router")]
    #[diagnostic(
        code(routerclients::acquisition_failed),
        help("{reason}\nRe-run with -vv to see every command and request.")
    )]
    AcquisitionFailed { step: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("The {strategy} strategy cannot use this configuration: `{field}` {reason}")]
    #[diagnostic(
        code(routerclients::missing_setting),
        help(
            "Set `{field}` in your profile or pass it as a flag.\n\
             Passwords can be stored with: routerclients config set-password"
        )
    )]
    MissingSetting {
        strategy: String,
        field: String,
        reason: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(routerclients::validation))]
    Validation { field: String, reason: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(routerclients::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Or pass --host and --transport to run without a profile."
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No router configured")]
    #[diagnostic(
        code(routerclients::no_config),
        help(
            "Add a profile to {path}\n\
             or pass --host and --transport."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(routerclients::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::MissingSetting { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::Config(_) => exit_code::AUTH,
            Self::Validation { .. } => exit_code::USAGE,
            Self::AcquisitionFailed { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration {
                strategy,
                field,
                reason,
            } => Self::MissingSetting {
                strategy: strategy.into(),
                field: field.into(),
                reason,
            },
            CoreError::Connection { host, reason } => Self::ConnectionFailed { host, reason },
            CoreError::Acquisition { step, reason } => Self::AcquisitionFailed { step, reason },
            CoreError::Store { path, reason } => Self::Io(std::io::Error::other(format!(
                "first-seen store {path}: {reason}"
            ))),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
