//! Model invocation with multi-round, multi-candidate retry.
//!
//! For each round, every candidate model is tried once, in order. The first
//! non-empty completion wins. Between rounds the invoker sleeps for
//! `backoff_step × round`. When every attempt has failed the caller gets
//! [`InvocationOutcome::Exhausted`] rather than an error, so it can decide
//! how to degrade.

use dsatutor_config::AppConfig;
use dsatutor_core::error::ProviderError;
use dsatutor_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How many rounds to run and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub rounds: u32,
    pub backoff_step: Duration,
}

impl RetryPolicy {
    pub fn new(rounds: u32, backoff_step: Duration) -> Self {
        Self {
            rounds,
            backoff_step,
        }
    }

    /// Delay after a failed round (1-based). Linear in the round number.
    pub fn backoff_after(&self, round: u32) -> Duration {
        self.backoff_step * round
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

/// Fixed generation parameters sent with every attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

/// Result of a full invocation.
#[derive(Debug, Clone)]
pub enum InvocationOutcome {
    /// A candidate produced non-empty text.
    Completed {
        text: String,
        model: String,
        round: u32,
        attempts: usize,
    },
    /// Every (round, candidate) attempt failed.
    Exhausted {
        attempts: usize,
        last_error: Option<ProviderError>,
    },
}

impl InvocationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn attempts(&self) -> usize {
        match self {
            Self::Completed { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// Drives a [`Provider`] across an ordered candidate list.
pub struct ModelInvoker {
    provider: Arc<dyn Provider>,
    candidates: Vec<String>,
    policy: RetryPolicy,
    params: CompletionParams,
}

impl ModelInvoker {
    /// Duplicate candidates are dropped, keeping first occurrence.
    pub fn new(provider: Arc<dyn Provider>, candidates: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
        for model in candidates {
            if !unique.contains(&model) {
                unique.push(model);
            }
        }

        Self {
            provider,
            candidates: unique,
            policy: RetryPolicy::default(),
            params: CompletionParams::default(),
        }
    }

    /// Build an invoker using the candidate list, retry policy and
    /// generation parameters from configuration.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider, config.candidate_models())
            .with_policy(RetryPolicy::new(
                config.retry.rounds,
                Duration::from_millis(config.retry.backoff_step_ms),
            ))
            .with_params(CompletionParams {
                temperature: config.models.temperature,
                max_tokens: config.models.max_tokens,
            })
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run the retry loop for one composed prompt.
    pub async fn invoke(&self, prompt: &str) -> InvocationOutcome {
        let mut attempts = 0usize;
        let mut last_error: Option<ProviderError> = None;

        if self.candidates.is_empty() {
            warn!("No candidate models configured");
            return InvocationOutcome::Exhausted {
                attempts,
                last_error,
            };
        }

        for round in 1..=self.policy.rounds {
            for model in &self.candidates {
                attempts += 1;
                debug!(model = %model, round, attempt = attempts, "Trying model");

                match self.attempt(model, prompt).await {
                    Ok(text) => {
                        info!(model = %model, round, attempts, "Model produced a completion");
                        return InvocationOutcome::Completed {
                            text,
                            model: model.clone(),
                            round,
                            attempts,
                        };
                    }
                    Err(e) => {
                        warn!(model = %model, round, error = %e, "Model attempt failed");
                        last_error = Some(e);
                    }
                }
            }

            if round < self.policy.rounds {
                let delay = self.policy.backoff_after(round);
                debug!(round, delay_ms = delay.as_millis() as u64, "Backing off before next round");
                tokio::time::sleep(delay).await;
            }
        }

        warn!(attempts, "All model attempts exhausted");
        InvocationOutcome::Exhausted {
            attempts,
            last_error,
        }
    }

    async fn attempt(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = ProviderRequest::single_prompt(model, prompt)
            .with_temperature(self.params.temperature)
            .with_max_tokens(self.params.max_tokens);

        let response = self.provider.complete(request).await?;

        match response.text() {
            Some(text) => Ok(text.to_string()),
            None => Err(ProviderError::EmptyCompletion {
                model: model.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dsatutor_core::message::Message;
    use dsatutor_core::provider::ProviderResponse;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Per-model scripted behaviour.
    #[derive(Clone)]
    enum Script {
        Reply(&'static str),
        Empty,
        NoChoices,
        Fail,
        /// Fail for the first `n` calls to this model, then reply.
        FailTimes(usize, &'static str),
    }

    struct ScriptedProvider {
        scripts: HashMap<String, Script>,
        calls: Mutex<Vec<String>>,
        last_request: Mutex<Option<ProviderRequest>>,
    }

    impl ScriptedProvider {
        fn new(scripts: &[(&str, Script)]) -> Self {
            Self {
                scripts: scripts
                    .iter()
                    .map(|(m, s)| (m.to_string(), s.clone()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
                last_request: Mutex::new(None),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn calls_to(&self, model: &str) -> usize {
            self.calls().iter().filter(|m| *m == model).count()
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            let model = request.model.clone();
            let seen = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(model.clone());
                calls.iter().filter(|m| **m == model).count()
            };
            *self.last_request.lock().unwrap() = Some(request);

            let reply = |text: &str| ProviderResponse {
                message: Some(Message::assistant(text)),
                usage: None,
                model: model.clone(),
            };

            match self.scripts.get(&model).cloned().unwrap_or(Script::Fail) {
                Script::Reply(text) => Ok(reply(text)),
                Script::Empty => Ok(reply("")),
                Script::NoChoices => Ok(ProviderResponse {
                    message: None,
                    usage: None,
                    model: model.clone(),
                }),
                Script::Fail => Err(ProviderError::ApiError {
                    status_code: 500,
                    message: "Internal Server Error".into(),
                }),
                Script::FailTimes(n, text) if seen > n => Ok(reply(text)),
                Script::FailTimes(..) => Err(ProviderError::Network("conn reset".into())),
            }
        }
    }

    fn candidates(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn first_candidate_succeeds() {
        let provider = Arc::new(ScriptedProvider::new(&[
            ("a", Script::Reply("hello")),
            ("b", Script::Reply("other")),
        ]));
        let invoker = ModelInvoker::new(provider.clone(), candidates(&["a", "b"]));

        match invoker.invoke("prompt").await {
            InvocationOutcome::Completed {
                text,
                model,
                round,
                attempts,
            } => {
                assert_eq!(text, "hello");
                assert_eq!(model, "a");
                assert_eq!(round, 1);
                assert_eq!(attempts, 1);
            }
            other => panic!("Expected Completed, got: {other:?}"),
        }
        assert_eq!(provider.calls(), vec!["a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn later_candidates_are_not_called_after_success() {
        let provider = Arc::new(ScriptedProvider::new(&[
            ("a", Script::Fail),
            ("b", Script::Reply("from b")),
            ("c", Script::Reply("from c")),
        ]));
        let invoker = ModelInvoker::new(provider.clone(), candidates(&["a", "b", "c"]));

        let outcome = invoker.invoke("prompt").await;
        assert!(outcome.is_completed());
        assert_eq!(outcome.attempts(), 2);
        assert_eq!(provider.calls(), vec!["a", "b"]);
        assert_eq!(provider.calls_to("c"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_completion_moves_to_next_candidate() {
        let provider = Arc::new(ScriptedProvider::new(&[
            ("a", Script::Empty),
            ("b", Script::NoChoices),
            ("c", Script::Reply("finally")),
        ]));
        let invoker = ModelInvoker::new(provider.clone(), candidates(&["a", "b", "c"]));

        match invoker.invoke("prompt").await {
            InvocationOutcome::Completed { text, model, .. } => {
                assert_eq!(text, "finally");
                assert_eq!(model, "c");
            }
            other => panic!("Expected Completed, got: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_tries_every_candidate_every_round() {
        let provider = Arc::new(ScriptedProvider::new(&[
            ("a", Script::Fail),
            ("b", Script::Empty),
        ]));
        let invoker = ModelInvoker::new(provider.clone(), candidates(&["a", "b"]));

        let start = tokio::time::Instant::now();
        let outcome = invoker.invoke("prompt").await;
        let elapsed = start.elapsed();

        match outcome {
            InvocationOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 6);
                assert!(matches!(
                    last_error,
                    Some(ProviderError::EmptyCompletion { ref model }) if model == "b"
                ));
            }
            other => panic!("Expected Exhausted, got: {other:?}"),
        }
        assert_eq!(provider.calls(), vec!["a", "b", "a", "b", "a", "b"]);

        // 500ms after round 1, 1000ms after round 2, nothing after round 3.
        assert!(elapsed >= Duration::from_millis(1500));
        assert!(elapsed < Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn success_in_second_round() {
        let provider = Arc::new(ScriptedProvider::new(&[("a", Script::FailTimes(1, "retry ok"))]));
        let invoker = ModelInvoker::new(provider.clone(), candidates(&["a"]));

        let start = tokio::time::Instant::now();
        match invoker.invoke("prompt").await {
            InvocationOutcome::Completed {
                text,
                round,
                attempts,
                ..
            } => {
                assert_eq!(text, "retry ok");
                assert_eq!(round, 2);
                assert_eq!(attempts, 2);
            }
            other => panic!("Expected Completed, got: {other:?}"),
        }
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert!(start.elapsed() < Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_candidate_list_is_exhausted_immediately() {
        let provider = Arc::new(ScriptedProvider::new(&[]));
        let invoker = ModelInvoker::new(provider.clone(), Vec::new());

        match invoker.invoke("prompt").await {
            InvocationOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 0);
                assert!(last_error.is_none());
            }
            other => panic!("Expected Exhausted, got: {other:?}"),
        }
        assert!(provider.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn requests_carry_generation_parameters() {
        let provider = Arc::new(ScriptedProvider::new(&[("a", Script::Reply("ok"))]));
        let invoker = ModelInvoker::new(provider.clone(), candidates(&["a"]));

        invoker.invoke("Explain binary search").await;

        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "a");
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, Some(2048));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "Explain binary search");
    }

    #[test]
    fn duplicate_candidates_are_dropped() {
        let provider = Arc::new(ScriptedProvider::new(&[]));
        let invoker = ModelInvoker::new(provider, candidates(&["a", "b", "a", "c", "b"]));
        assert_eq!(invoker.candidates(), &["a", "b", "c"]);
    }

    #[test]
    fn backoff_is_linear_in_round() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_after(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_after(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff_after(3), Duration::from_millis(1500));
    }

    #[test]
    fn from_config_uses_override_first() {
        let mut config = AppConfig::default();
        config.model_name_override = Some("custom-model".into());
        config.retry.rounds = 2;

        let provider = Arc::new(ScriptedProvider::new(&[]));
        let invoker = ModelInvoker::from_config(provider, &config);

        assert_eq!(invoker.candidates()[0], "custom-model");
        assert_eq!(invoker.policy().rounds, 2);
    }
}
