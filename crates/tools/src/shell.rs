//! Host shell command runner.
//!
//! Commands run through `sh -c` (or `cmd /C` on Windows) with stdout and
//! stderr captured and combined. An optional timeout kills a runaway
//! command and reports the fact instead of hanging the session.

use async_trait::async_trait;
use ori_core::directive::RunOutput;
use ori_core::runner::CommandRunner;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs directives' commands through the host shell.
pub struct HostShell {
    timeout: Option<Duration>,
}

impl HostShell {
    /// A shell with no timeout: commands run until they exit.
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Kill commands that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(command: &str) -> Command {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command]);
            c
        };
        cmd.kill_on_drop(true);
        cmd
    }
}

impl Default for HostShell {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for HostShell {
    async fn run(&self, command: &str) -> RunOutput {
        debug!(command = %command, "Executing shell command");

        let output_future = Self::command(command).output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, output_future).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(command = %command, timeout_secs = limit.as_secs(), "Command timed out");
                    return RunOutput {
                        ran: true,
                        output: format!("[timed out after {}s]", limit.as_secs()),
                    };
                }
            },
            None => output_future.await,
        };

        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();

                let text = if output.status.success() {
                    if stderr.is_empty() {
                        stdout
                    } else {
                        format!("{stdout}\n[stderr]: {stderr}")
                    }
                } else {
                    let code = output.status.code().unwrap_or(-1);
                    warn!(command = %command, exit_code = code, "Command failed");
                    format!("[exit code: {code}]\n{stdout}\n{stderr}")
                };

                RunOutput {
                    ran: true,
                    output: text.trim().to_string(),
                }
            }
            Err(e) => RunOutput {
                ran: false,
                output: format!("Failed to start command: {e}"),
            },
        }
    }
}
