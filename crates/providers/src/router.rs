//! Provider construction from configuration.
//!
//! The tutor talks to exactly one completion endpoint. Without an API key
//! there is no client at all, and callers fall through to the offline reply.

use crate::openai_compat::OpenAiCompatProvider;
use dsatutor_config::AppConfig;
use dsatutor_core::provider::Provider;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the completion client described by `config`.
///
/// Returns `None` when no API key is configured, when the provider name has
/// no known endpoint and no `api_url` is set, or when the HTTP client
/// cannot be created.
pub fn build_from_config(config: &AppConfig) -> Option<Arc<dyn Provider>> {
    let api_key = match config.api_key.as_deref() {
        Some(key) if !key.is_empty() => key,
        _ => {
            warn!("No API key configured; model client not initialized");
            return None;
        }
    };

    let base_url = match config
        .api_url
        .clone()
        .or_else(|| default_base_url(&config.provider).map(String::from))
    {
        Some(url) => url,
        None => {
            warn!(provider = %config.provider, "Unknown provider and no api_url set");
            return None;
        }
    };

    match OpenAiCompatProvider::new(&config.provider, &base_url, api_key) {
        Ok(provider) => {
            info!(provider = %config.provider, base_url = %base_url, "Model client initialized");
            Some(Arc::new(provider))
        }
        Err(e) => {
            warn!(error = %e, "Failed to initialize model client");
            None
        }
    }
}

/// Default base URL for well-known OpenAI-compatible providers.
pub fn default_base_url(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "groq" => Some("https://api.groq.com/openai/v1"),
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        _ => None,
    }
}
