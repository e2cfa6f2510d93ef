//! Error types for the Ori domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type; everything composes into the
//! top-level [`Error`]. Client failures are deliberately fine-grained: the
//! agent renders each kind as distinct, human-legible conversation text
//! rather than crashing.

use thiserror::Error;

/// The top-level error type for all Ori operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Chat client errors ---
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// A typed failure from the remote chat endpoint.
///
/// Every variant maps to a distinct failure mode of the request cycle, so
/// the agent can tell the user exactly what went wrong.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Connection, DNS, or TLS failure before any response arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the client's deadline.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The provider rejected the request for volume reasons (HTTP 429).
    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    /// The provider rejected the credentials (HTTP 401/403).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The provider returned a structured error payload.
    #[error("API error: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    /// The response body was not valid JSON.
    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    /// The response was valid JSON but missing expected fields.
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_status_and_message() {
        let err = Error::Client(ClientError::Api {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn failure_kinds_render_distinctly() {
        let kinds = [
            ClientError::Network("connection refused".into()),
            ClientError::Timeout("after 120s".into()),
            ClientError::RateLimited("slow down".into()),
            ClientError::AuthenticationFailed("bad key".into()),
            ClientError::MalformedBody("not json".into()),
            ClientError::UnexpectedShape("no choices".into()),
        ];
        let rendered: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
        for (i, a) in rendered.iter().enumerate() {
            for b in rendered.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
