//! Live review sessions, one per user.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use wordswipe_core::ReviewSession;

/// Shared handle to one session. Held for the whole of a decision so that
/// decisions on the same session are applied one at a time.
pub type SessionHandle = Arc<AsyncMutex<ReviewSession>>;

/// Sessions untouched for this long are dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct Entry {
    user_id: Uuid,
    session: SessionHandle,
    last_used: Instant,
}

/// Registry of review sessions keyed by session id.
pub struct ReviewRegistry {
    sessions: Mutex<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
}

impl Default for ReviewRegistry {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl ReviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Store a new session, dropping any earlier session of the same user
    /// and every idle one.
    pub fn insert(&self, session: ReviewSession) -> SessionHandle {
        let user_id = session.user_id();
        let session_id = session.id();
        let handle = Arc::new(AsyncMutex::new(session));
        let now = Instant::now();

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, entry| {
            entry.user_id != user_id && now.duration_since(entry.last_used) <= self.idle_timeout
        });
        sessions.insert(
            session_id,
            Entry {
                user_id,
                session: handle.clone(),
                last_used: now,
            },
        );
        handle
    }

    /// Look up a live session owned by `user_id` and mark it used.
    pub fn get(&self, user_id: Uuid, session_id: Uuid) -> Option<SessionHandle> {
        self.get_at(user_id, session_id, Instant::now())
    }

    fn get_at(&self, user_id: Uuid, session_id: Uuid, now: Instant) -> Option<SessionHandle> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = sessions
            .get_mut(&session_id)
            .filter(|entry| entry.user_id == user_id)?;

        if now.duration_since(entry.last_used) > self.idle_timeout {
            sessions.remove(&session_id);
            return None;
        }
        entry.last_used = now;
        Some(entry.session.clone())
    }

    /// Drop every session idle longer than the timeout. Returns how many went.
    pub fn prune_idle(&self) -> usize {
        self.prune_idle_at(Instant::now())
    }

    fn prune_idle_at(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_used) <= self.idle_timeout);
        before - sessions.len()
    }

    /// Drop every session of a user.
    pub fn remove_user(&self, user_id: Uuid) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, entry| entry.user_id != user_id);
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
