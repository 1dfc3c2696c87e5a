//! Provider trait: the abstraction over the remote completion API.
//!
//! A Provider sends a list of messages to a named model and returns the
//! completion. It also exposes one typed capability-listing operation
//! ([`Provider::list_models`]) so callers never probe the client.

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model identifier (e.g., "llama-3.1-8b-instant")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

impl ProviderRequest {
    /// A request carrying a single user message.
    pub fn single_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::user(prompt)],
            temperature: default_temperature(),
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A complete (non-streaming) response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The first completion choice, if the API returned any.
    pub message: Option<Message>,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

impl ProviderResponse {
    /// The completion text, only when present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_ref()
            .map(|m| m.content.as_str())
            .filter(|c| !c.is_empty())
    }
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "groq").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;

    /// List the model identifiers this provider can serve.
    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        Ok(Vec::new())
    }

    /// Whether the provider is reachable.
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_prompt_defaults() {
        let req = ProviderRequest::single_prompt("llama-3.1-8b-instant", "hello");
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.max_tokens.is_none());
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn builder_sets_parameters() {
        let req = ProviderRequest::single_prompt("m", "p")
            .with_temperature(0.2)
            .with_max_tokens(2048);
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(req.max_tokens, Some(2048));
    }

    #[test]
    fn response_text_ignores_empty_content() {
        let empty = ProviderResponse {
            message: Some(Message::assistant("")),
            usage: None,
            model: "m".into(),
        };
        assert!(empty.text().is_none());

        let missing = ProviderResponse {
            message: None,
            usage: None,
            model: "m".into(),
        };
        assert!(missing.text().is_none());

        let full = ProviderResponse {
            message: Some(Message::assistant("### Step 1")),
            usage: None,
            model: "m".into(),
        };
        assert_eq!(full.text(), Some("### Step 1"));
    }
}
