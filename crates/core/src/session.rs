//! Session domain types: the per-browser exchange log.
//!
//! A session owns an ordered list of [`Exchange`]s, oldest first. Exchanges
//! are appended after every reply and only ever removed all at once by an
//! explicit clear.

use crate::error::SessionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque session identifier carried in the browser cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One student message and the tutor text produced for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub user_text: String,
    pub tutor_text: String,
}

impl Exchange {
    pub fn new(user_text: impl Into<String>, tutor_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            tutor_text: tutor_text.into(),
        }
    }
}

/// A conversation's full exchange history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,

    /// Ordered exchanges, oldest first.
    pub exchanges: Vec<Exchange>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            exchanges: Vec::new(),
        }
    }

    pub fn push(&mut self, exchange: Exchange) {
        self.exchanges.push(exchange);
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

/// Server-side storage for session histories.
///
/// Every operation touches exactly one session key. Implementations must not
/// hold a lock across calls; callers read, release, call the model, then append.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the session, creating an empty one if it does not exist. Idempotent.
    ///
    /// Fails only when a new session would exceed the store's capacity.
    async fn get_or_create(&self, id: &SessionId) -> Result<Session, SessionError>;

    /// Append an exchange and return the new history length.
    async fn append(&self, id: &SessionId, exchange: Exchange) -> Result<usize, SessionError>;

    /// Empty the session's history. Clearing an unknown or empty session is not an error.
    async fn clear(&self, id: &SessionId) -> Result<(), SessionError>;

    /// Number of live sessions.
    async fn count(&self) -> Result<usize, SessionError>;
}
