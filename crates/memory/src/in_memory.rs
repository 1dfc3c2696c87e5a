//! In-memory session store with idle eviction.
//!
//! Histories live until cleared, until they sit idle longer than the TTL, or
//! until process exit. Idle sessions are swept whenever a new one is created,
//! and the number of live sessions is capped.

use async_trait::async_trait;
use dsatutor_core::error::SessionError;
use dsatutor_core::session::{Exchange, Session, SessionId, SessionStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

struct Entry {
    session: Session,
    last_active: Instant,
}

impl Entry {
    fn is_idle(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_active) >= ttl
    }
}

/// Stores every session in a map behind a single async `RwLock`.
///
/// The lock is taken for one operation at a time and released before the
/// call returns. Two concurrent appends to the same session both land, in
/// lock-acquisition order.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Entry>>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
            max_sessions,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// The live entry for `id`, touched at `now`. An idle entry counts as
    /// gone: it is swept with the others and replaced by an empty session.
    fn live_entry<'a>(
        &self,
        sessions: &'a mut HashMap<SessionId, Entry>,
        id: &SessionId,
        now: Instant,
    ) -> Result<&'a mut Entry, SessionError> {
        let live = sessions
            .get(id)
            .is_some_and(|entry| !entry.is_idle(now, self.idle_ttl));

        if !live {
            let before = sessions.len();
            sessions.retain(|_, entry| !entry.is_idle(now, self.idle_ttl));
            let evicted = before - sessions.len();
            if evicted > 0 {
                debug!(evicted, remaining = sessions.len(), "Evicted idle sessions");
            }

            if sessions.len() >= self.max_sessions {
                warn!(limit = self.max_sessions, "Session store full, refusing new session");
                return Err(SessionError::CapacityExceeded {
                    limit: self.max_sessions,
                });
            }
            debug!(session = %id, "Created session");
        }

        let entry = sessions.entry(id.clone()).or_insert_with(|| Entry {
            session: Session::new(id.clone()),
            last_active: now,
        });
        entry.last_active = now;
        Ok(entry)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, id: &SessionId) -> Result<Session, SessionError> {
        let mut sessions = self.sessions.write().await;
        let entry = self.live_entry(&mut sessions, id, Instant::now())?;
        Ok(entry.session.clone())
    }

    async fn append(&self, id: &SessionId, exchange: Exchange) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.write().await;
        let entry = self.live_entry(&mut sessions, id, Instant::now())?;
        entry.session.push(exchange);
        Ok(entry.session.len())
    }

    async fn clear(&self, id: &SessionId) -> Result<(), SessionError> {
        if let Some(entry) = self.sessions.write().await.get_mut(id) {
            entry.session.clear();
            entry.last_active = Instant::now();
            debug!(session = %id, "Cleared session");
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize, SessionError> {
        let now = Instant::now();
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|entry| !entry.is_idle(now, self.idle_ttl))
            .count())
    }
}
