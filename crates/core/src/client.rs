//! The chat completion client trait — the seam to the remote model.
//!
//! Implementations live in `ori-providers`. The client is stateless beyond
//! authentication: it receives the full message history on every call and
//! returns exactly one assistant message or a typed failure. Conversation
//! state is owned by the caller, never by the client.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::message::Message;

/// Sends a role-tagged message history to a remote model and returns the
/// assistant's reply.
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    /// Client name for logging ("openrouter", "mock", ...).
    fn name(&self) -> &str;

    /// Send the full history and wait for one assistant message.
    ///
    /// The call runs to completion before the agent does anything else;
    /// there is no streaming and no parallel dispatch.
    async fn send(&self, history: &[Message]) -> Result<Message, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    struct EchoClient;

    #[async_trait]
    impl ChatCompletionClient for EchoClient {
        fn name(&self) -> &str {
            "echo"
        }

        async fn send(&self, history: &[Message]) -> Result<Message, ClientError> {
            let last = history
                .last()
                .ok_or_else(|| ClientError::UnexpectedShape("empty history".into()))?;
            Ok(Message::assistant(format!("echo: {}", last.content)))
        }
    }

    #[tokio::test]
    async fn client_is_usable_as_trait_object() {
        let client: Box<dyn ChatCompletionClient> = Box::new(EchoClient);
        let history = vec![Message::user("ping")];
        let reply = client.send(&history).await.unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, "echo: ping");
    }

    #[tokio::test]
    async fn empty_history_is_a_typed_failure() {
        let client = EchoClient;
        let err = client.send(&[]).await.unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedShape(_)));
    }
}
