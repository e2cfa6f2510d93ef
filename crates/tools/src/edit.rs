//! Edit directive handling.
//!
//! The `[edit]` payload is structured JSON naming an operation and target
//! files. Concrete file mutation is deliberately not performed here: the
//! directive is validated and acknowledged with a summary outcome, and a
//! malformed payload becomes a failed outcome fed back to the model.

use ori_core::directive::{EditDirective, ExecutionOutcome};
use tracing::debug;

/// Validate an `[edit]` payload and produce its outcome.
pub fn acknowledge_edit(payload: &str) -> ExecutionOutcome {
    match EditDirective::parse(payload) {
        Ok(edit) => {
            debug!(operation = edit.operation.as_str(), targets = ?edit.targets, "Edit directive accepted");
            ExecutionOutcome::success(format!(
                "Edit directive accepted: {} on {}",
                edit.operation.as_str(),
                edit.targets.join(", ")
            ))
        }
        Err(e) => ExecutionOutcome::failure(format!("Edit directive rejected: {e}")),
    }
}
