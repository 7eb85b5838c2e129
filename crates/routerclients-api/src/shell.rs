// Remote command execution seam.
//
// The SSH session implements `CommandShell`; tests substitute a scripted
// shell. Callers that only care about stdout use `exec_checked`, which
// turns a non-zero exit status into `Error::CommandFailed`.

use async_trait::async_trait;

use crate::error::Error;

/// Captured result of one remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_status: u32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

/// Something that can run a shell command on the router and report back.
///
/// Implementations must tolerate concurrent calls: independent commands
/// are issued in parallel over one session.
#[async_trait]
pub trait CommandShell: Send + Sync {
    /// Run `command` and capture its output, whatever the exit status.
    async fn exec(&self, command: &str) -> Result<CommandOutput, Error>;

    /// Run `command`, returning stdout only if it exited with status 0.
    async fn exec_checked(&self, command: &str) -> Result<String, Error> {
        let output = self.exec(command).await?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(Error::CommandFailed {
                command: command.to_owned(),
                status: output.exit_status,
                stderr: output.stderr.trim().to_owned(),
            })
        }
    }
}
