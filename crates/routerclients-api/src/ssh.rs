// SSH command session
//
// One authenticated russh connection per fetch. Every command runs on its
// own session channel, so independent commands can be in flight at the
// same time over a single login.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::{ChannelMsg, Disconnect};
use russh_keys::key;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::error::Error;
use crate::shell::{CommandOutput, CommandShell};

/// Exit status reported when the server closes a channel without one.
const MISSING_EXIT_STATUS: u32 = 255;

/// Where to connect and as whom.
#[derive(Debug, Clone)]
pub struct SshTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub timeout: Duration,
}

/// How to prove identity to the router.
#[derive(Debug, Clone)]
pub enum SshAuth {
    Password(SecretString),
    /// PEM/OpenSSH-encoded private key held in memory.
    PrivateKey(SecretString),
    /// Path to a private key file on disk.
    PrivateKeyFile(PathBuf),
}

/// Router firmware regenerates host keys on reset; we accept whatever is
/// presented and log its fingerprint.
struct RouterHandler;

#[async_trait]
impl client::Handler for RouterHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &key::PublicKey,
    ) -> Result<bool, Self::Error> {
        debug!(fingerprint = %server_public_key.fingerprint(), "accepting router host key");
        Ok(true)
    }
}

/// An authenticated SSH connection to a router.
pub struct SshSession {
    handle: Mutex<Handle<RouterHandler>>,
    host: String,
}

impl SshSession {
    /// Open the TCP connection, complete the handshake and authenticate.
    ///
    /// Fails with [`Error::SshAuthRejected`] when the server refuses the
    /// credential, so callers can tell a wrong password from a dead host.
    pub async fn connect(target: &SshTarget, auth: &SshAuth) -> Result<Self, Error> {
        let config = Arc::new(client::Config {
            inactivity_timeout: Some(target.timeout),
            ..Default::default()
        });

        debug!(host = %target.host, port = target.port, "opening SSH session");

        let connecting = client::connect(
            config,
            (target.host.as_str(), target.port),
            RouterHandler,
        );
        let mut handle = tokio::time::timeout(target.timeout, connecting)
            .await
            .map_err(|_| Error::Ssh(russh::Error::ConnectionTimeout))??;

        let accepted = match auth {
            SshAuth::Password(password) => {
                handle
                    .authenticate_password(target.username.as_str(), password.expose_secret())
                    .await?
            }
            SshAuth::PrivateKey(pem) => {
                let key = russh_keys::decode_secret_key(pem.expose_secret(), None)
                    .map_err(|e| Error::SshKey(e.to_string()))?;
                handle
                    .authenticate_publickey(target.username.as_str(), Arc::new(key))
                    .await?
            }
            SshAuth::PrivateKeyFile(path) => {
                let key = russh_keys::load_secret_key(path, None)
                    .map_err(|e| Error::SshKey(format!("{}: {e}", path.display())))?;
                handle
                    .authenticate_publickey(target.username.as_str(), Arc::new(key))
                    .await?
            }
        };

        if !accepted {
            return Err(Error::SshAuthRejected {
                username: target.username.clone(),
            });
        }

        debug!(host = %target.host, "SSH session authenticated");
        Ok(Self {
            handle: Mutex::new(handle),
            host: target.host.clone(),
        })
    }

    /// Politely end the session.
    pub async fn close(self) -> Result<(), Error> {
        let handle = self.handle.into_inner();
        handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await?;
        debug!(host = %self.host, "SSH session closed");
        Ok(())
    }
}

#[async_trait]
impl CommandShell for SshSession {
    async fn exec(&self, command: &str) -> Result<CommandOutput, Error> {
        // Hold the lock only while opening the channel; the channel itself
        // is independent of the handle afterwards.
        let mut channel = self.handle.lock().await.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_status = None;

        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext: 1 } => stderr.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status: code } => exit_status = Some(code),
                _ => {}
            }
        }

        trace!(
            command,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            ?exit_status,
            "command finished"
        );

        Ok(CommandOutput {
            exit_status: exit_status.unwrap_or(MISSING_EXIT_STATUS),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}
