//! The execution gate.
//!
//! Every directive passes through the gate before anything touches the
//! system. Unless auto-confirm is on, the gate asks the [`Confirm`]
//! implementation first; a declined directive is never dispatched, so the
//! command runner and file writer cannot observe it.

use ori_core::directive::{Directive, ExecutionOutcome};
use ori_core::runner::CommandRunner;
use ori_tools::{FileWriter, acknowledge_edit};
use std::sync::Arc;
use tracing::{debug, info};

/// Answers the "run this?" question for a single directive.
///
/// Implementations are synchronous: the terminal front end blocks on a
/// keystroke, and tests answer from a script.
pub trait Confirm: Send + Sync {
    /// `true` to execute the directive, `false` to decline it.
    fn confirm(&self, directive: &Directive) -> bool;
}

/// What the gate did with a directive.
#[derive(Debug)]
pub enum GateDecision {
    /// The directive ran (or was rejected by its own handler); here is the outcome.
    Executed(ExecutionOutcome),
    /// The user declined; nothing was dispatched.
    Declined,
}

/// Dispatches confirmed directives to their handlers.
pub struct ExecutionGate {
    runner: Arc<dyn CommandRunner>,
    confirmer: Arc<dyn Confirm>,
    writer: FileWriter,
    auto_confirm: bool,
}

impl ExecutionGate {
    pub fn new(runner: Arc<dyn CommandRunner>, confirmer: Arc<dyn Confirm>) -> Self {
        Self {
            runner,
            confirmer,
            writer: FileWriter::new(),
            auto_confirm: false,
        }
    }

    /// Skip confirmation and execute every directive.
    pub fn with_auto_confirm(mut self, auto_confirm: bool) -> Self {
        self.auto_confirm = auto_confirm;
        self
    }

    /// Gate and, if confirmed, execute one directive.
    pub async fn process(&self, directive: &Directive) -> GateDecision {
        if !self.auto_confirm && !self.confirmer.confirm(directive) {
            info!(kind = directive.kind(), "Directive declined by user");
            return GateDecision::Declined;
        }

        debug!(kind = directive.kind(), "Executing directive");
        let outcome = match directive {
            Directive::Exec { command } => {
                let run = self.runner.run(command).await;
                ExecutionOutcome {
                    succeeded: run.ran,
                    output: run.output,
                }
            }
            Directive::Edit { payload } => acknowledge_edit(payload),
            Directive::WriteFile { path, content } => self.writer.write(path, content).await,
        };
        GateDecision::Executed(outcome)
    }
}
