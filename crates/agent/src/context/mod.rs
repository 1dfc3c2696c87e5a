//! Conversation context for the next prompt.
//!
//! Only a bounded tail of the history is surfaced to the model, and each
//! exchange is cut to a fixed number of characters. Older exchanges stay in
//! the session but never reach the prompt.

pub mod truncate;
pub mod window;

pub use truncate::truncate_chars;
pub use window::ContextWindow;
