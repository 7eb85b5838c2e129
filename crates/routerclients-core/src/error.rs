// ── Core error types ──
//
// Three failure classes reach the caller of a fetch: bad configuration
// (caught at construction), a failed connect, and a failed acquisition
// step. Transport errors from `routerclients-api` are folded into one of
// the latter two depending on which phase produced them.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    /// Required input missing or unusable. Raised before any network access.
    #[error("Configuration error ({strategy}): `{field}` {reason}")]
    Configuration {
        strategy: &'static str,
        field: &'static str,
        reason: String,
    },

    // ── Connection errors ────────────────────────────────────────────
    /// Login or reachability failure while establishing a session.
    #[error("Cannot connect to router at {host}: {reason}")]
    Connection { host: String, reason: String },

    // ── Acquisition errors ───────────────────────────────────────────
    /// A remote call made while building the snapshot failed or returned
    /// data that could not be interpreted. `step` names the command or
    /// endpoint.
    #[error("Failed to acquire {step}: {reason}")]
    Acquisition { step: String, reason: String },

    // ── Persistence errors ───────────────────────────────────────────
    /// First-seen store could not be read or written. Never fails a fetch.
    #[error("First-seen store {path}: {reason}")]
    Store { path: String, reason: String },
}

impl CoreError {
    pub(crate) fn missing(strategy: &'static str, field: &'static str) -> Self {
        Self::Configuration {
            strategy,
            field,
            reason: "is required".into(),
        }
    }

    pub(crate) fn connection(host: &str, err: &routerclients_api::Error) -> Self {
        let reason = if err.is_unreachable() {
            format!("router unreachable: {err}")
        } else {
            err.to_string()
        };
        Self::Connection {
            host: host.to_owned(),
            reason,
        }
    }

    pub(crate) fn acquisition(step: impl Into<String>, reason: impl ToString) -> Self {
        Self::Acquisition {
            step: step.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` for errors caused by the caller's configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
