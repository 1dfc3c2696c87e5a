//! The tutoring pipeline.
//!
//! One student message flows through four steps:
//!
//! 1. **Context**: the last few exchanges are summarized into a bounded block
//! 2. **Prompt**: the pedagogical template, context and message are merged
//! 3. **Invoke**: candidate models are tried over several rounds
//! 4. **Fallback**: if every attempt fails, a deterministic reply is produced
//!
//! [`TutorAgent::handle`] runs all four and always returns text.

pub mod context;
pub mod fallback;
pub mod prompt;
pub mod tutor;

pub use context::{ContextWindow, truncate_chars};
pub use fallback::fallback_response;
pub use prompt::{PROMPT_SUFFIX, PromptComposer, SYSTEM_PROMPT, compose};
pub use tutor::{ReplySource, TutorAgent, TutorReply};
