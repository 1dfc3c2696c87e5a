//! The tutor agent: context, prompt, invocation and fallback in one call.

use crate::context::ContextWindow;
use crate::fallback::fallback_response;
use crate::prompt::PromptComposer;
use dsatutor_config::AppConfig;
use dsatutor_core::provider::Provider;
use dsatutor_core::session::Exchange;
use dsatutor_providers::{InvocationOutcome, ModelInvoker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Where a reply's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Model,
    Fallback,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TutorReply {
    pub text: String,
    pub source: ReplySource,
    /// Model that answered, when `source` is `Model`.
    pub model: Option<String>,
    /// Completion calls made for this reply.
    pub attempts: usize,
}

impl TutorReply {
    fn fallback(message: &str, attempts: usize) -> Self {
        Self {
            text: fallback_response(message),
            source: ReplySource::Fallback,
            model: None,
            attempts,
        }
    }
}

/// Produces one reply per student message. Holds no per-session state.
pub struct TutorAgent {
    invoker: Option<ModelInvoker>,
    window: ContextWindow,
    composer: PromptComposer,
}

impl TutorAgent {
    /// `None` means no model client: every reply is the fallback.
    pub fn new(invoker: Option<ModelInvoker>) -> Self {
        Self {
            invoker,
            window: ContextWindow::default(),
            composer: PromptComposer::default(),
        }
    }

    pub fn from_config(config: &AppConfig, provider: Option<Arc<dyn Provider>>) -> Self {
        let invoker = provider.map(|p| ModelInvoker::from_config(p, config));
        Self::new(invoker)
            .with_window(ContextWindow::from(&config.context))
            .with_composer(PromptComposer::from_config(&config.tutor))
    }

    pub fn with_window(mut self, window: ContextWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn has_model_client(&self) -> bool {
        self.invoker.is_some()
    }

    pub fn candidates(&self) -> &[String] {
        self.invoker.as_ref().map(|i| i.candidates()).unwrap_or(&[])
    }

    /// The full prompt that would be sent for `message` given `history`.
    pub fn build_prompt(&self, message: &str, history: &[Exchange]) -> String {
        let context = self.window.assemble(history);
        self.composer.compose(&context, message)
    }

    /// Answer `message`. Never fails; degrades to the fallback reply.
    pub async fn handle(&self, message: &str, history: &[Exchange]) -> TutorReply {
        let Some(invoker) = &self.invoker else {
            warn!("Model client not initialized, using fallback reply");
            return TutorReply::fallback(message, 0);
        };

        let prompt = self.build_prompt(message, history);

        match invoker.invoke(&prompt).await {
            InvocationOutcome::Completed {
                text,
                model,
                round,
                attempts,
            } => {
                info!(model = %model, round, attempts, "Tutor reply from model");
                TutorReply {
                    text,
                    source: ReplySource::Model,
                    model: Some(model),
                    attempts,
                }
            }
            InvocationOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                match last_error {
                    Some(e) => warn!(attempts, error = %e, "Model attempts exhausted, using fallback reply"),
                    None => warn!(attempts, "Model attempts exhausted, using fallback reply"),
                }
                TutorReply::fallback(message, attempts)
            }
        }
    }
}
