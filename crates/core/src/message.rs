//! Message and Conversation domain types.
//!
//! These are the core value objects that flow through the system:
//! the user types a message → it joins the conversation → the full history
//! goes to the model → the reply joins the conversation in turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (identity, directive grammar)
    System,
    /// The end user — including synthetic turns the agent appends on the
    /// user's behalf to carry directive outcomes back into context
    User,
    /// The remote model
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// When this message was created locally
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// An append-only, ordered sequence of messages forming the model's context
/// window.
///
/// The single-system-message invariant (at most one, always first) is
/// enforced at construction: [`Conversation::new`] starts empty and
/// [`Conversation::with_system`] seeds exactly one system message. Later
/// pushes are not re-checked.
///
/// The store is owned by exactly one caller and passed by `&mut` — the chat
/// client never holds conversation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was added
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a conversation seeded with one system message.
    pub fn with_system(content: impl Into<String>) -> Self {
        let mut conv = Self::new();
        conv.messages.push(Message::system(content));
        conv
    }

    /// Append a message. Messages are never reordered or mutated in place.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// The full ordered history, resent verbatim to the model on every call.
    /// No windowing or truncation.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Hello, agent!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello, agent!");
    }

    #[test]
    fn with_system_seeds_first_message() {
        let conv = Conversation::with_system("You are Ori.");
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.messages()[0].role, Role::System);
    }

    #[test]
    fn push_appends_in_order() {
        let mut conv = Conversation::with_system("sys");
        conv.push(Message::user("first"));
        conv.push(Message::assistant("second"));
        conv.push(Message::user("third"));

        let roles: Vec<Role> = conv.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(conv.last().unwrap().content, "third");
    }

    #[test]
    fn push_preserves_prior_elements() {
        let mut conv = Conversation::new();
        conv.push(Message::user("a"));
        conv.push(Message::assistant("b"));
        let before: Vec<String> = conv.messages().iter().map(|m| m.content.clone()).collect();

        conv.push(Message::user("c"));
        let after: Vec<String> = conv.messages().iter().map(|m| m.content.clone()).collect();

        assert_eq!(after[..2], before[..]);
        assert_eq!(after.last().unwrap(), "c");
    }

    #[test]
    fn message_serialization_uses_lowercase_roles() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert!(json.contains("\"assistant\""));
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.role, Role::Assistant);
    }

    #[test]
    fn conversation_tracks_updates() {
        let mut conv = Conversation::new();
        let created = conv.created_at;

        conv.push(Message::user("First message"));
        assert_eq!(conv.len(), 1);
        assert!(conv.updated_at >= created);
    }
}
