//! Provider interaction: the chat-completion call behind a trait seam.
//!
//! This is the only stage with network I/O. The [`TextGenerator`] trait
//! keeps it swappable: production uses [`OpenAiChatClient`] against any
//! OpenAI-compatible `/chat/completions` endpoint; tests inject scripted
//! providers that succeed, fail, or stall on demand.
//!
//! There is deliberately no retry loop here. A failed call does not block
//! the request — the orchestrator falls through to the deterministic
//! fallback generator — so retrying would only add latency to a path that
//! already has a guaranteed answer.

use crate::error::GenerationError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Default OpenAI-compatible endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// A chat-completion backend: one system message, one user message, one
/// text completion back. No streaming, no tool calls.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError>;
}

/// OpenAI-compatible chat-completion client.
///
/// Works against any endpoint speaking the `/chat/completions` shape
/// (OpenAI, Azure-compatible proxies, local inference servers) — set
/// `base_url` accordingly.
pub struct OpenAiChatClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: usize,
    timeout_secs: u64,
}

impl OpenAiChatClient {
    /// Build a client, failing only when no API key is available.
    ///
    /// The failure is a [`GenerationError`], not a fatal one: a deployment
    /// without credentials still serves fallback listings.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        temperature: f32,
        max_tokens: usize,
        timeout_secs: u64,
    ) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingCredentials);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: base_url.into(),
            temperature,
            max_tokens,
            timeout_secs,
        })
    }

    /// Build a client from `OPENAI_API_KEY`, with model and base URL
    /// overridable via `LISTSMITH_MODEL` and `LISTSMITH_BASE_URL`.
    pub fn from_env(
        temperature: f32,
        max_tokens: usize,
        timeout_secs: u64,
    ) -> Result<Self, GenerationError> {
        let api_key =
            std::env::var("OPENAI_API_KEY").map_err(|_| GenerationError::MissingCredentials)?;
        let model =
            std::env::var("LISTSMITH_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            std::env::var("LISTSMITH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(api_key, model, base_url, temperature, max_tokens, timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for OpenAiChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        debug!(model = %self.model, "requesting chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    GenerationError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Http {
                status: status.as_u16(),
                body: truncate(&body, 300),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Network(format!("malformed response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(GenerationError::EmptyCompletion);
        }

        debug!(chars = content.len(), "completion received");
        Ok(content)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_missing_credentials() {
        let err = OpenAiChatClient::new("", DEFAULT_MODEL, DEFAULT_BASE_URL, 0.7, 1024, 20)
            .err()
            .expect("empty key must fail");
        assert!(matches!(err, GenerationError::MissingCredentials));
    }

    #[test]
    fn truncate_limits_length() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 3), "ab");
    }
}
