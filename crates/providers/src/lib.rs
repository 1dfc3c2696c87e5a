//! Completion API client and retry orchestration for the DSA tutor.
//!
//! [`OpenAiCompatProvider`] implements `dsatutor_core::Provider` against any
//! OpenAI-compatible `/chat/completions` endpoint (Groq by default).
//! [`ModelInvoker`] walks an ordered list of model candidates over several
//! rounds and reports an explicit [`InvocationOutcome`].

pub mod invoker;
pub mod openai_compat;
pub mod router;

pub use invoker::{CompletionParams, InvocationOutcome, ModelInvoker, RetryPolicy};
pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
