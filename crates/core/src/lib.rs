//! # DSA Tutor Core
//!
//! Domain types, traits, and error definitions for the DSA tutor backend.
//! This crate has **no framework dependencies**: it defines the model that
//! the provider, session store, tool and gateway crates implement against.
//!
//! ## Seams
//!
//! - [`Provider`]: the remote chat-completion API
//! - [`SessionStore`]: per-session exchange history
//! - [`Tool`]: static lookup helpers exposed to students
//!
//! Every seam is a trait so tests can swap in scripted implementations.

pub mod error;
pub mod message;
pub mod provider;
pub mod session;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ProviderError, SessionError, ToolError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use session::{Exchange, Session, SessionId, SessionStore};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
