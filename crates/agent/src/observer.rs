//! Observation points for the directive loop.
//!
//! The loop calls the observer synchronously between steps, so a terminal
//! front end can print assistant text before the confirmation prompt for
//! the directive that follows it. Observers must not block on I/O beyond
//! ordinary terminal writes.

use ori_core::directive::{Directive, ExecutionOutcome};

/// Receives loop progress callbacks in execution order.
pub trait TurnObserver: Send + Sync {
    /// Literal text from the model, emitted in reply order around directives.
    fn assistant_text(&self, text: &str);

    /// A directive was parsed and is about to be gated.
    fn directive_started(&self, directive: &Directive);

    /// A directive finished (executed, declined, or rejected).
    fn directive_finished(&self, directive: &Directive, outcome: &ExecutionOutcome);

    /// The directive turn limit was reached; the loop is stopping early.
    fn turn_limit_reached(&self, limit: u32);
}

/// An observer that ignores everything. Useful in tests and batch runs.
pub struct NullObserver;

impl TurnObserver for NullObserver {
    fn assistant_text(&self, _text: &str) {}
    fn directive_started(&self, _directive: &Directive) {}
    fn directive_finished(&self, _directive: &Directive, _outcome: &ExecutionOutcome) {}
    fn turn_limit_reached(&self, _limit: u32) {}
}
