//! Chat completion client for cooking prompts against an LLM API.
//!
//! Thin wrapper over an OpenAI-style chat completions endpoint. The API key
//! is held in memory for the duration of a call and never persisted.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Settings for completion calls.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// API credential, sent as a bearer token
    pub api_key: String,
    /// Model identifier requested from the API
    pub model: String,
    /// Sampling temperature, bounded to [0.0, 2.0]
    pub temperature: f32,
    /// Optional completion length cap
    pub max_tokens: Option<u32>,
    /// Alternative API base URL
    pub base_url: Option<Url>,
}

impl CompletionConfig {
    /// Create a config with default temperature and endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            base_url: None,
        }
    }

    /// Set the sampling temperature, clamped to [0.0, 2.0]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Cap the completion length
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Point the client at an alternative API base URL
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    fn endpoint(&self) -> String {
        let base = self
            .base_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for the completion API.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    config: CompletionConfig,
}

impl CompletionClient {
    /// Create a client for the given settings
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// The settings this client was created with
    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Send one prompt and return the completion text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Completion`] on transport failures, non-2xx
    /// responses (with status and body in the message), undecodable
    /// responses, and responses carrying no choices.
    pub async fn complete(&self, prompt: &str) -> crate::Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        log::debug!(
            "Requesting completion from {} with model {}",
            self.config.endpoint(),
            self.config.model
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| crate::Error::completion(format!("Completion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(crate::Error::completion(format!(
                "Completion API returned HTTP {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            crate::Error::completion(format!("Failed to decode completion response: {}", e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| crate::Error::completion("Completion response contained no choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_is_clamped() {
        let config = CompletionConfig::new("key", "gpt-4").with_temperature(3.5);
        assert_eq!(config.temperature, 2.0);

        let config = CompletionConfig::new("key", "gpt-4").with_temperature(-1.0);
        assert_eq!(config.temperature, 0.0);

        let config = CompletionConfig::new("key", "gpt-4").with_temperature(0.7);
        assert_eq!(config.temperature, 0.7);
    }

    #[test]
    fn test_default_endpoint() {
        let config = CompletionConfig::new("key", "gpt-4");
        assert_eq!(
            config.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_custom_base_url_endpoint() {
        let base = Url::parse("http://localhost:8080/v1/").unwrap();
        let config = CompletionConfig::new("key", "gpt-4").with_base_url(base);
        assert_eq!(config.endpoint(), "http://localhost:8080/v1/chat/completions");
    }
}
