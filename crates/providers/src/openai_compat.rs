//! OpenAI-compatible provider implementation.
//!
//! Works with Groq, OpenAI, OpenRouter, Ollama and any endpoint exposing
//! `/chat/completions` and `/models` in the OpenAI wire format.

use async_trait::async_trait;
use dsatutor_core::error::ProviderError;
use dsatutor_core::message::Message;
use dsatutor_core::provider::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Transport-level bound on a single HTTP call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// An OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    ///
    /// Fails only when the HTTP client itself cannot be constructed
    /// (for example, no usable TLS backend).
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a Groq provider (convenience constructor).
    pub fn groq(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new("groq", "https://api.groq.com/openai/v1", api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str().into(),
                content: Some(m.content.clone()),
            })
            .collect()
    }

    fn request_body(request: &ProviderRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    /// Map a parsed API response onto the provider-neutral shape.
    /// A response without choices yields `message: None`.
    fn into_provider_response(api_response: ApiResponse) -> ProviderResponse {
        let message = api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| Message::assistant(choice.message.content.unwrap_or_default()));

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        ProviderResponse {
            message,
            usage,
            model: api_response.model,
        }
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::request_body(&request);

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(5);
            return Err(ProviderError::RateLimited { retry_after_secs });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status == 404 {
            return Err(ProviderError::ModelNotFound(request.model));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        Ok(Self::into_provider_response(api_response))
    }

    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }
        if !response.status().is_success() {
            return Err(ProviderError::ApiError {
                status_code: status,
                message: response.text().await.unwrap_or_default(),
            });
        }

        let listing: ModelListResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: status,
                message: format!("Failed to parse model list: {e}"),
            })?;

        Ok(listing.data.into_iter().map(|m| m.id).collect())
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groq_constructor() {
        let provider = OpenAiCompatProvider::groq("gsk-test").unwrap();
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.base_url(), "https://api.groq.com/openai/v1");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let provider = OpenAiCompatProvider::new("local", "http://localhost:8080/v1/", "k").unwrap();
        assert_eq!(provider.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn request_body_carries_fixed_parameters() {
        let req = ProviderRequest::single_prompt("llama-3.1-8b-instant", "Explain two sum")
            .with_temperature(0.7)
            .with_max_tokens(2048);
        let body = OpenAiCompatProvider::request_body(&req);
        assert_eq!(body["model"], "llama-3.1-8b-instant");
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Explain two sum");
    }

    #[test]
    fn request_body_omits_unset_max_tokens() {
        let req = ProviderRequest::single_prompt("m", "p");
        let body = OpenAiCompatProvider::request_body(&req);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn parse_completion_response() {
        let data = r#"{
            "model": "llama-3.1-8b-instant",
            "choices": [{"message": {"role": "assistant", "content": "Step 1: restate the problem"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let response = OpenAiCompatProvider::into_provider_response(parsed);
        assert_eq!(response.text(), Some("Step 1: restate the problem"));
        assert_eq!(response.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn parse_response_without_choices() {
        let data = r#"{"model": "llama-3.1-8b-instant", "choices": []}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let response = OpenAiCompatProvider::into_provider_response(parsed);
        assert!(response.message.is_none());
        assert!(response.text().is_none());
    }

    #[test]
    fn parse_null_content_as_empty() {
        let data = r#"{"model": "m", "choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let response = OpenAiCompatProvider::into_provider_response(parsed);
        assert!(response.message.is_some());
        assert!(response.text().is_none());
    }

    #[test]
    fn parse_model_listing() {
        let data = r#"{"object": "list", "data": [{"id": "llama-3.1-8b-instant"}, {"id": "qwen/qwen3-32b"}]}"#;
        let parsed: ModelListResponse = serde_json::from_str(data).unwrap();
        let ids: Vec<String> = parsed.data.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["llama-3.1-8b-instant", "qwen/qwen3-32b"]);
    }
}
