//! Shell tool: execute one command line under a timeout.

use agentrelay_core::error::ToolError;
use agentrelay_core::tool::{ShellOutput, ShellRunner};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs commands through the platform shell (`sh -c` / `cmd /C`).
///
/// The child gets a null stdin and is killed if the timeout elapses.
pub struct ShellTool {
    timeout: Duration,
}

impl ShellTool {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn command(command: &str) -> Command {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };
        cmd.stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }
}

impl Default for ShellTool {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

#[async_trait]
impl ShellRunner for ShellTool {
    async fn run(&self, command: &str) -> Result<ShellOutput, ToolError> {
        debug!(command = %command, "Executing shell command");

        let running = Self::command(command).output();
        let output = match tokio::time::timeout(self.timeout, running).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(command = %command, error = %e, "Command could not be started");
                return Err(ToolError::SpawnFailed(e.to_string()));
            }
            Err(_) => {
                let timeout_secs = self.timeout.as_secs();
                warn!(command = %command, timeout_secs, "Command timed out");
                return Err(ToolError::Timeout { timeout_secs });
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        if exit_code != 0 {
            warn!(command = %command, exit_code, "Command failed");
        }

        Ok(ShellOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
        })
    }
}
