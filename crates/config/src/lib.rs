//! Configuration loading, validation, and management for the DSA tutor.
//!
//! Loads configuration from `~/.dsatutor/config.toml`, then a `.env` file in
//! the working directory, then environment variable overrides. Validates all
//! settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Model identifiers tried after the optional override, in priority order.
pub const DEFAULT_CANDIDATES: [&str; 3] = [
    "llama-3.1-8b-instant",
    "llama-3.3-70b-versatile",
    "qwen/qwen3-32b",
];

const DEV_SESSION_SECRET: &str = "dev-secret-key-change-in-production";

/// The root configuration structure.
///
/// Maps directly to `~/.dsatutor/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion endpoint. `None` leaves the model client
    /// uninitialized and every reply degrades to the fallback template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider name, used to pick the default base URL
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Explicit base URL (overrides the provider default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model tried before every default candidate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name_override: Option<String>,

    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub context: ContextConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub tutor: TutorConfig,
}

fn default_provider() -> String {
    "groq".into()
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model_name_override", &self.model_name_override)
            .field("models", &self.models)
            .field("retry", &self.retry)
            .field("context", &self.context)
            .field("gateway", &self.gateway)
            .field("tutor", &self.tutor)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Default candidate list (the override is prepended at runtime)
    #[serde(default = "default_candidates")]
    pub candidates: Vec<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_candidates() -> Vec<String> {
    DEFAULT_CANDIDATES.iter().map(|m| m.to_string()).collect()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Full passes over the candidate list
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Linear backoff step: wait `step × round` between rounds
    #[serde(default = "default_backoff_step_ms")]
    pub backoff_step_ms: u64,
}

fn default_rounds() -> u32 {
    3
}
fn default_backoff_step_ms() -> u64 {
    500
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            backoff_step_ms: default_backoff_step_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default = "default_max_exchanges")]
    pub max_exchanges: usize,

    #[serde(default = "default_user_chars")]
    pub user_chars: usize,

    #[serde(default = "default_tutor_chars")]
    pub tutor_chars: usize,
}

fn default_max_exchanges() -> usize {
    4
}
fn default_user_chars() -> usize {
    150
}
fn default_tutor_chars() -> usize {
    200
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_exchanges: default_max_exchanges(),
            user_chars: default_user_chars(),
            tutor_chars: default_tutor_chars(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Key for signing session cookies
    #[serde(default = "default_session_secret")]
    pub session_secret: String,

    /// Idle seconds before a session is evicted; also the cookie `Max-Age`
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Upper bound on live sessions held in memory
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_port() -> u16 {
    5001
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_session_secret() -> String {
    DEV_SESSION_SECRET.into()
}
fn default_session_ttl_secs() -> u64 {
    3600
}
fn default_max_sessions() -> usize {
    10_000
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("session_secret", &"[REDACTED]")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("max_sessions", &self.max_sessions)
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            session_secret: default_session_secret(),
            session_ttl_secs: default_session_ttl_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Replace the built-in instructional template entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.dsatutor/config.toml).
    ///
    /// A `.env` file in the working directory is read first, then these
    /// environment variables override the file:
    /// - `DSATUTOR_API_KEY`, `GROQ_API_KEY`
    /// - `DSATUTOR_PROVIDER`, `DSATUTOR_API_URL`
    /// - `DSATUTOR_MODEL`, `MODEL_NAME`
    /// - `DSATUTOR_PORT`
    /// - `DSATUTOR_SESSION_SECRET`, `SESSION_SECRET`
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;

        if config.gateway.session_secret == DEV_SESSION_SECRET {
            tracing::warn!("Using the built-in development session secret; set DSATUTOR_SESSION_SECRET");
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(*k))
                .find(|v| !v.trim().is_empty())
        };

        if let Some(key) = first(&["DSATUTOR_API_KEY", "GROQ_API_KEY"]) {
            self.api_key = Some(key);
        }
        if let Some(provider) = first(&["DSATUTOR_PROVIDER"]) {
            self.provider = provider;
        }
        if let Some(url) = first(&["DSATUTOR_API_URL"]) {
            self.api_url = Some(url);
        }
        if let Some(model) = first(&["DSATUTOR_MODEL", "MODEL_NAME"]) {
            self.model_name_override = Some(model);
        }
        if let Some(port) = first(&["DSATUTOR_PORT"]) {
            match port.parse() {
                Ok(p) => self.gateway.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid DSATUTOR_PORT"),
            }
        }
        if let Some(secret) = first(&["DSATUTOR_SESSION_SECRET", "SESSION_SECRET"]) {
            self.gateway.session_secret = secret;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".dsatutor")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.models.temperature) {
            return Err(ConfigError::ValidationError(
                "models.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.retry.rounds == 0 {
            return Err(ConfigError::ValidationError(
                "retry.rounds must be at least 1".into(),
            ));
        }

        if self.gateway.session_secret.is_empty() {
            return Err(ConfigError::ValidationError(
                "gateway.session_secret must not be empty".into(),
            ));
        }

        if self.gateway.session_ttl_secs == 0 || self.gateway.max_sessions == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.session_ttl_secs and gateway.max_sessions must be at least 1".into(),
            ));
        }

        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Ordered candidate list: the override first, then the configured
    /// defaults with duplicates removed (first occurrence wins).
    pub fn candidate_models(&self) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        let ordered = self
            .model_name_override
            .iter()
            .chain(self.models.candidates.iter());
        for model in ordered {
            if !model.is_empty() && !candidates.contains(model) {
                candidates.push(model.clone());
            }
        }
        candidates
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model_name_override: None,
            models: ModelsConfig::default(),
            retry: RetryConfig::default(),
            context: ContextConfig::default(),
            gateway: GatewayConfig::default(),
            tutor: TutorConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
