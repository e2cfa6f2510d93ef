//! The command runner trait — the seam to the host shell.
//!
//! The agent never spawns processes itself; it goes through this trait so
//! tests can substitute a recording fake and prove that declined directives
//! never reach the shell.

use async_trait::async_trait;

use crate::directive::RunOutput;

/// Runs one shell command to completion and captures its combined output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` through the host shell.
    ///
    /// Never returns an error: a process that could not be spawned is
    /// reported as `RunOutput { ran: false, .. }` with a diagnostic, so the
    /// failure flows back to the model as conversation text.
    async fn run(&self, command: &str) -> RunOutput;
}
