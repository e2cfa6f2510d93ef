//! Tagged-response parser.
//!
//! Scans one assistant reply for directive blocks and carves it into an
//! ordered sequence of [`Segment`]s, preserving surrounding literal text so
//! display and execution interleave in reply order.
//!
//! Grammar (case-sensitive, non-nesting, first-match-wins, scanned left to
//! right):
//!
//! ```text
//! [exec] <command> [/exec]
//! [edit] <json payload> [/edit]
//! [writefile(<path>)] <content> [/writefile]
//! ```
//!
//! Payloads are the exact substrings between the tags, untrimmed. A close
//! tag of the wrong kind is not matched and stays inside the payload. An
//! open tag with no matching close terminates scanning: all remaining text,
//! the tag included, becomes one trailing literal, so truncated model output
//! is surfaced instead of silently dropped.

use ori_core::{Directive, Segment};
use tracing::debug;

const OPEN_EXEC: &str = "[exec]";
const CLOSE_EXEC: &str = "[/exec]";
const OPEN_EDIT: &str = "[edit]";
const CLOSE_EDIT: &str = "[/edit]";
const OPEN_WRITEFILE: &str = "[writefile(";
const WRITEFILE_NAME_END: &str = ")]";
const CLOSE_WRITEFILE: &str = "[/writefile]";

/// Which open tag the scanner saw at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Exec,
    Edit,
    WriteFile,
}

/// Lazy iterator over the segments of one assistant reply.
///
/// Empty input yields no segments. Any non-empty input yields at least one.
pub struct ResponseTagParser<'a> {
    rest: &'a str,
    queued: Option<Segment>,
}

impl<'a> ResponseTagParser<'a> {
    pub fn new(reply: &'a str) -> Self {
        Self {
            rest: reply,
            queued: None,
        }
    }

    /// Earliest open tag from the cursor, if any. First match wins.
    fn find_open(&self) -> Option<(usize, TagKind)> {
        let candidates = [
            (self.rest.find(OPEN_EXEC), TagKind::Exec),
            (self.rest.find(OPEN_EDIT), TagKind::Edit),
            (self.rest.find(OPEN_WRITEFILE), TagKind::WriteFile),
        ];
        candidates
            .into_iter()
            .filter_map(|(idx, kind)| idx.map(|i| (i, kind)))
            .min_by_key(|&(i, _)| i)
    }

    /// Try to complete the open tag at `open_idx` into a directive.
    ///
    /// Returns the directive and the byte offset just past its close tag,
    /// or `None` when the block is unterminated.
    fn match_directive(&self, open_idx: usize, kind: TagKind) -> Option<(Directive, usize)> {
        match kind {
            TagKind::Exec => {
                let body_start = open_idx + OPEN_EXEC.len();
                let close = self.rest[body_start..].find(CLOSE_EXEC)?;
                let command = self.rest[body_start..body_start + close].to_string();
                Some((
                    Directive::Exec { command },
                    body_start + close + CLOSE_EXEC.len(),
                ))
            }
            TagKind::Edit => {
                let body_start = open_idx + OPEN_EDIT.len();
                let close = self.rest[body_start..].find(CLOSE_EDIT)?;
                let payload = self.rest[body_start..body_start + close].to_string();
                Some((
                    Directive::Edit { payload },
                    body_start + close + CLOSE_EDIT.len(),
                ))
            }
            TagKind::WriteFile => {
                let name_start = open_idx + OPEN_WRITEFILE.len();
                let name_end = self.rest[name_start..].find(WRITEFILE_NAME_END)?;
                let path = self.rest[name_start..name_start + name_end].to_string();
                let body_start = name_start + name_end + WRITEFILE_NAME_END.len();
                let close = self.rest[body_start..].find(CLOSE_WRITEFILE)?;
                let content = self.rest[body_start..body_start + close].to_string();
                Some((
                    Directive::WriteFile { path, content },
                    body_start + close + CLOSE_WRITEFILE.len(),
                ))
            }
        }
    }

    /// Consume everything from the cursor to the end as one literal.
    fn drain_literal(&mut self) -> Segment {
        let literal = Segment::Literal(self.rest.to_string());
        self.rest = "";
        literal
    }
}

impl Iterator for ResponseTagParser<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if let Some(seg) = self.queued.take() {
            return Some(seg);
        }
        if self.rest.is_empty() {
            return None;
        }

        let Some((open_idx, kind)) = self.find_open() else {
            return Some(self.drain_literal());
        };

        match self.match_directive(open_idx, kind) {
            Some((directive, end)) => {
                debug!(kind = directive.kind(), "directive parsed");
                let leading = &self.rest[..open_idx];
                let seg = Segment::Directive(directive);
                let leading_owned =
                    (!leading.is_empty()).then(|| Segment::Literal(leading.to_string()));
                self.rest = &self.rest[end..];
                match leading_owned {
                    Some(lit) => {
                        self.queued = Some(seg);
                        Some(lit)
                    }
                    None => Some(seg),
                }
            }
            // Unterminated block: surface the tail verbatim.
            None => {
                debug!(kind = ?kind, "unterminated directive block, emitting as literal");
                Some(self.drain_literal())
            }
        }
    }
}

/// Parse a full reply into segments.
pub fn segments(reply: &str) -> ResponseTagParser<'_> {
    ResponseTagParser::new(reply)
}
