use thiserror::Error;

/// Top-level error type for the `routerclients-api` crate.
///
/// Covers every failure mode of both wire surfaces: the web management
/// API (login, transport, non-200 responses, bad JSON) and the SSH
/// session (handshake, key loading, authentication, command exit status).
/// `routerclients-core` maps these into its connect/acquire taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login was refused (wrong credentials, lockout, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The login endpoint answered 200 but never handed out a session token.
    #[error("Login response did not set the `{cookie}` cookie")]
    MissingSessionCookie { cookie: &'static str },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Any non-200 answer from a data endpoint.
    #[error("{endpoint} returned HTTP {status}")]
    Http { status: u16, endpoint: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── SSH ─────────────────────────────────────────────────────────
    /// Protocol-level SSH failure (handshake, channel, disconnect).
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// The configured private key could not be read or decoded.
    #[error("Unusable SSH private key: {0}")]
    SshKey(String),

    /// The server rejected every offered credential.
    #[error("SSH authentication rejected for user '{username}'")]
    SshAuthRejected { username: String },

    /// A remote command ran but exited non-zero.
    #[error("Command `{command}` exited with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: u32,
        stderr: String,
    },
}

impl Error {
    /// Returns `true` if the failure happened before any credential was checked.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            Self::Ssh(russh::Error::ConnectionTimeout | russh::Error::IO(_)) => true,
            _ => false,
        }
    }
}
