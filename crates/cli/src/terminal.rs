//! Terminal front end: confirmation prompt and progress printing.
//!
//! Both pieces block on ordinary stdin/stdout. The loop calls them
//! synchronously, so the confirmation prompt always appears after the
//! directive it refers to has been printed.

use ori_agent::{Confirm, TurnObserver};
use ori_core::directive::{Directive, ExecutionOutcome};
use std::io::{BufRead, Write};

/// Asks on stdin before a directive runs. Only `y` or `Y` confirms.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, directive: &Directive) -> bool {
        print!("  Run this {} directive? [y/N] ", directive.kind());
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y")
    }
}

/// Prints loop progress to the terminal.
pub struct TerminalObserver;

impl TurnObserver for TerminalObserver {
    fn assistant_text(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        for line in trimmed.lines() {
            println!("  Ori > {line}");
        }
    }

    fn directive_started(&self, directive: &Directive) {
        println!("  [{}] {}", directive.kind(), directive.display_payload());
    }

    fn directive_finished(&self, _directive: &Directive, outcome: &ExecutionOutcome) {
        let marker = if outcome.succeeded { "ok" } else { "failed" };
        for line in outcome.output.trim().lines() {
            println!("  [{marker}] {line}");
        }
    }

    fn turn_limit_reached(&self, limit: u32) {
        println!("  [stopped] Directive turn limit ({limit}) reached.");
    }
}
