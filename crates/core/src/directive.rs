//! Directives — structured instructions extracted from model output.
//!
//! A model reply may embed tagged blocks asking the agent to run a shell
//! command, apply a file edit, or write a file. The parser carves the reply
//! into [`Segment`]s; the agent resolves each [`Directive`] into exactly one
//! [`ExecutionOutcome`] that is fed back to the model as a synthetic user
//! turn.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A local side effect requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Run a shell command. The payload is the exact text between the tags.
    Exec { command: String },

    /// Apply a structured file edit. The payload is carried raw; it is
    /// interpreted as an [`EditDirective`] at execution time so a malformed
    /// payload becomes a failed outcome instead of a parse abort.
    Edit { payload: String },

    /// Write a file. The path comes verbatim from the tag parameter; the
    /// content is the exact text between the tags, embedded newlines
    /// included.
    WriteFile { path: String, content: String },
}

impl Directive {
    /// Short human-readable label used in prompts and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Directive::Exec { .. } => "exec",
            Directive::Edit { .. } => "edit",
            Directive::WriteFile { .. } => "writefile",
        }
    }

    /// The literal payload shown to the user when asking for confirmation.
    pub fn display_payload(&self) -> String {
        match self {
            Directive::Exec { command } => command.clone(),
            Directive::Edit { payload } => payload.clone(),
            Directive::WriteFile { path, content } => {
                format!("{path} ({} bytes)", content.len())
            }
        }
    }
}

/// One unit of a parsed model reply: either literal text to display, or a
/// directive to resolve. Segments preserve the reply's original order so
/// display and execution interleave correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Directive(Directive),
}

/// The result of resolving one directive, success or not. Always serialized
/// into the next synthetic user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub succeeded: bool,
    pub output: String,
}

impl ExecutionOutcome {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            output: output.into(),
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            output: output.into(),
        }
    }
}

/// Raw result of a shell invocation. `ran` is false when the process could
/// not be spawned at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub ran: bool,
    pub output: String,
}

/// The operation requested by an `[edit]` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOperation {
    Search,
    Replace,
    Modify,
    Refactor,
    Rename,
    Compare,
}

impl EditOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditOperation::Search => "search",
            EditOperation::Replace => "replace",
            EditOperation::Modify => "modify",
            EditOperation::Refactor => "refactor",
            EditOperation::Rename => "rename",
            EditOperation::Compare => "compare",
        }
    }
}

/// The structured form of an `[edit]` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditDirective {
    /// What to do
    pub operation: EditOperation,

    /// One or more target file paths
    pub targets: Vec<String>,

    /// Operation-specific parameters, passed through opaquely
    #[serde(default)]
    pub params: serde_json::Value,
}

impl EditDirective {
    /// Parse the raw payload of an `[edit]` block.
    pub fn parse(payload: &str) -> Result<Self, EditPayloadError> {
        let directive: EditDirective = serde_json::from_str(payload)?;
        if directive.targets.is_empty() {
            return Err(EditPayloadError::NoTargets);
        }
        Ok(directive)
    }
}

/// Why an `[edit]` payload could not be interpreted.
#[derive(Debug, Error)]
pub enum EditPayloadError {
    #[error("invalid edit payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("edit payload names no target files")]
    NoTargets,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_replace_payload() {
        let payload = r#"{
            "operation": "replace",
            "targets": ["src/main.rs"],
            "params": {"find": "foo", "with": "bar"}
        }"#;
        let edit = EditDirective::parse(payload).unwrap();
        assert_eq!(edit.operation, EditOperation::Replace);
        assert_eq!(edit.targets, vec!["src/main.rs"]);
        assert_eq!(edit.params["find"], "foo");
    }

    #[test]
    fn parse_rejects_unknown_operation() {
        let payload = r#"{"operation": "delete", "targets": ["a.txt"]}"#;
        assert!(matches!(
            EditDirective::parse(payload),
            Err(EditPayloadError::Json(_))
        ));
    }

    #[test]
    fn parse_rejects_empty_targets() {
        let payload = r#"{"operation": "search", "targets": []}"#;
        assert!(matches!(
            EditDirective::parse(payload),
            Err(EditPayloadError::NoTargets)
        ));
    }

    #[test]
    fn parse_rejects_non_json() {
        assert!(EditDirective::parse("not json at all").is_err());
    }

    #[test]
    fn params_default_to_null() {
        let payload = r#"{"operation": "compare", "targets": ["a.txt", "b.txt"]}"#;
        let edit = EditDirective::parse(payload).unwrap();
        assert!(edit.params.is_null());
        assert_eq!(edit.targets.len(), 2);
    }

    #[test]
    fn display_payload_summarizes_writefile() {
        let d = Directive::WriteFile {
            path: "notes.txt".into(),
            content: "hello".into(),
        };
        assert_eq!(d.display_payload(), "notes.txt (5 bytes)");
        assert_eq!(d.kind(), "writefile");
    }
}
