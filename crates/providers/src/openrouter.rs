//! OpenRouter chat completion client.
//!
//! Works with OpenRouter and any other OpenAI-compatible
//! `/chat/completions` endpoint. Non-streaming only: the agent waits for
//! the complete reply before parsing it for directives.
//!
//! Every failure mode of the request cycle maps to a distinct
//! [`ClientError`] variant so the agent can tell the user exactly what went
//! wrong: transport vs. timeout vs. rate limit vs. auth vs. structured API
//! error vs. unparseable body vs. missing fields.

use async_trait::async_trait;
use ori_core::error::ClientError;
use ori_core::message::{Message, Role};
use ori_core::ChatCompletionClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default OpenRouter API base.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model when the config names none.
pub const DEFAULT_MODEL: &str = "tngtech/deepseek-r1t2-chimera:free";

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// A chat completion client for OpenAI-compatible endpoints.
pub struct OpenRouterClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    client: reqwest::Client,
}

impl OpenRouterClient {
    /// Create a client against the OpenRouter API with the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("ori/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: OPENROUTER_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: None,
            client,
        }
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Convert domain messages to the wire format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::System => "system".into(),
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                },
                content: m.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl ChatCompletionClient for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn send(&self, history: &[Message]) -> Result<Message, ClientError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(history),
            "temperature": self.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        debug!(model = %self.model, turns = history.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(format!("no response after {REQUEST_TIMEOUT_SECS}s"))
                } else {
                    ClientError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if status != 200 {
            warn!(status, body = %text, "Provider returned error");
        }

        parse_body(status, &text)
    }
}

/// Map one response (status + raw body) to an assistant message or a typed
/// failure.
fn parse_body(status: u16, body: &str) -> Result<Message, ClientError> {
    if status == 429 {
        return Err(ClientError::RateLimited(error_detail(body)));
    }
    if status == 401 || status == 403 {
        return Err(ClientError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ));
    }
    if status != 200 {
        return Err(ClientError::Api {
            status_code: status,
            message: error_detail(body),
        });
    }

    let api_response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| ClientError::MalformedBody(format!("invalid JSON: {e}")))?;

    // OpenRouter can return a structured error with HTTP 200.
    if let Some(err) = api_response.error {
        return Err(ClientError::Api {
            status_code: err.code.unwrap_or(status),
            message: err.message,
        });
    }

    let choice = api_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::UnexpectedShape("no choices in response".into()))?;

    let content = choice
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| ClientError::UnexpectedShape("choice has no message content".into()))?;

    Ok(Message::assistant(content))
}

/// Pull a readable message out of an error body, falling back to the raw
/// text when it is not the usual `{"error": {"message": ...}}` shape.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ApiResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string())
}

// --- Wire types (internal) ---

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    #[serde(default)]
    message: Option<ApiReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    code: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constructor_targets_openrouter() {
        let client = OpenRouterClient::new("sk-test");
        assert_eq!(client.name(), "openrouter");
        assert!(client.base_url.contains("openrouter.ai"));
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn builder_overrides() {
        let client = OpenRouterClient::new("sk-test")
            .with_base_url("http://localhost:11434/v1/")
            .with_model("llama3")
            .with_max_tokens(Some(512));
        assert_eq!(client.base_url, "http://localhost:11434/v1");
        assert_eq!(client.model(), "llama3");
        assert_eq!(client.max_tokens, Some(512));
    }

    #[test]
    fn message_conversion_uses_lowercase_roles() {
        let messages = vec![Message::system("You are Ori"), Message::user("Hello")];
        let api_messages = OpenRouterClient::to_api_messages(&messages);
        assert_eq!(api_messages.len(), 2);
        assert_eq!(api_messages[0].role, "system");
        assert_eq!(api_messages[1].role, "user");
        assert_eq!(api_messages[1].content, "Hello");
    }

    #[test]
    fn parse_happy_path() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hi there"}}]}"#;
        let msg = parse_body(200, body).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "Hi there");
    }

    #[test]
    fn parse_invalid_json_is_malformed_body() {
        let err = parse_body(200, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ClientError::MalformedBody(_)));
    }

    #[test]
    fn parse_missing_choices_is_unexpected_shape() {
        let err = parse_body(200, r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedShape(_)));
    }

    #[test]
    fn parse_missing_content_is_unexpected_shape() {
        let err = parse_body(200, r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedShape(_)));
    }

    #[test]
    fn parse_error_object_with_200_is_api_error() {
        let body = r#"{"error":{"message":"model not available","code":404}}"#;
        let err = parse_body(200, body).unwrap_err();
        match err {
            ClientError::Api {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 404);
                assert!(message.contains("model not available"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn parse_429_is_rate_limited() {
        let err = parse_body(429, r#"{"error":{"message":"slow down"}}"#).unwrap_err();
        match err {
            ClientError::RateLimited(detail) => assert_eq!(detail, "slow down"),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn parse_401_is_authentication_failed() {
        assert!(matches!(
            parse_body(401, "").unwrap_err(),
            ClientError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            parse_body(403, "").unwrap_err(),
            ClientError::AuthenticationFailed(_)
        ));
    }

    #[test]
    fn parse_other_status_is_api_error_with_raw_body() {
        let err = parse_body(500, "internal server error").unwrap_err();
        match err {
            ClientError::Api {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "internal server error");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
