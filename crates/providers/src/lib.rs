//! Chat client implementations for Ori.
//!
//! All clients implement the `ori_core::ChatCompletionClient` trait. The
//! default target is OpenRouter, but any OpenAI-compatible
//! `/chat/completions` endpoint works via `OpenRouterClient::with_base_url`.

pub mod openrouter;

pub use openrouter::OpenRouterClient;
