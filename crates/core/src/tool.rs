//! Shell runner trait: how the tools agent acts in the world.
//!
//! The orchestrator only ever needs one capability: run a single command
//! line and capture what it printed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    pub stdout: String,
    pub stderr: String,

    /// Process exit code; -1 when the process was terminated by a signal
    pub exit_code: i32,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Render the output the way it is shown to the main agent.
    ///
    /// stdout first, then `[STDERR]` if anything was written there, then
    /// `[EXIT CODE]` for a non-zero exit. Falls back to `(no output)`.
    pub fn render(&self) -> String {
        let mut output = self.stdout.clone();
        if !self.stderr.is_empty() {
            output.push_str("\n[STDERR] ");
            output.push_str(&self.stderr);
        }
        if self.exit_code != 0 {
            output.push_str(&format!("\n[EXIT CODE] {}", self.exit_code));
        }

        let trimmed = output.trim();
        if trimmed.is_empty() {
            "(no output)".into()
        } else {
            trimmed.to_string()
        }
    }
}

/// Render either a finished command or the reason it never finished.
pub fn render_outcome(outcome: &std::result::Result<ShellOutput, ToolError>) -> String {
    match outcome {
        Ok(output) => output.render(),
        Err(ToolError::Timeout { .. }) => "[ERROR] Command timed out".into(),
        Err(e) => format!("[ERROR] {e}"),
    }
}

/// Executes one command line and captures its output.
///
/// Implementations must bound execution with a timeout and must not
/// interpret the command beyond handing it to a shell.
#[async_trait]
pub trait ShellRunner: Send + Sync {
    async fn run(&self, command: &str) -> std::result::Result<ShellOutput, ToolError>;
}
