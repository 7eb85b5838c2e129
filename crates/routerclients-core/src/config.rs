// ── Runtime router configuration ──
//
// These types describe *how* to reach one router. They carry credential
// data and connection tuning, but never touch disk. The CLI constructs a
// `RouterConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use strum::{Display, EnumString};

/// Router firmware family. Each family owns one or more strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RouterFamily {
    #[default]
    Asus,
}

/// How to talk to the router; selects the acquisition strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Transport {
    /// Interactive command session.
    Ssh,
    /// Web management API over plain HTTP.
    Http,
    /// Web management API over HTTPS.
    Https,
}

impl Transport {
    /// URL scheme for the web transports.
    pub fn scheme(self) -> Option<&'static str> {
        match self {
            Self::Ssh => None,
            Self::Http => Some("http"),
            Self::Https => Some("https"),
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs). Default for home routers.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for one router.
///
/// Fields are optional where a strategy may or may not need them; each
/// strategy validates what it requires when it is constructed.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub provider: RouterFamily,
    pub transport: Transport,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    /// In-memory private key (SSH only).
    pub private_key: Option<SecretString>,
    /// Private key file (SSH only).
    pub private_key_path: Option<PathBuf>,
    pub tls: TlsVerification,
    /// Per-request / connect timeout.
    pub timeout: Duration,
    /// How long after first sight a client still counts as new.
    pub recency_window: Duration,
    /// Flush the first-seen store to disk after every fetch.
    pub persist: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            provider: RouterFamily::default(),
            transport: Transport::Http,
            host: None,
            port: None,
            username: None,
            password: None,
            private_key: None,
            private_key_path: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            recency_window: Duration::from_secs(60 * 60 * 24),
            persist: false,
        }
    }
}
