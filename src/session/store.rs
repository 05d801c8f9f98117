// Session store
//
// The engine only needs keyed, per-session atomic updates of a bounded
// history. Whole-session eviction is a deployment policy and is off unless
// configured.

use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

use super::history::{SessionHistory, SessionRecord, MAX_HISTORY_WINDOW};
use crate::errors::{CrisisError, CrisisResult};

/// Retention settings for the in-memory store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPolicy {
    /// Turns retained per session, at most `MAX_HISTORY_WINDOW`
    pub history_window: usize,
    /// Cap on tracked sessions; the least recently active one is evicted to make room
    pub max_sessions: Option<usize>,
    /// Sessions idle this long are dropped by `evict_idle`
    pub idle_timeout_minutes: Option<u64>,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            history_window: 10,
            max_sessions: None,
            idle_timeout_minutes: None,
        }
    }
}

impl SessionPolicy {
    pub fn validate(&self) -> CrisisResult<()> {
        if self.history_window == 0 {
            return Err(CrisisError::Config(
                "session.history_window must be at least 1".to_string(),
            ));
        }
        if self.history_window > MAX_HISTORY_WINDOW {
            return Err(CrisisError::Config(format!(
                "session.history_window must be at most {}, got {}",
                MAX_HISTORY_WINDOW, self.history_window
            )));
        }
        if self.max_sessions == Some(0) {
            return Err(CrisisError::Config(
                "session.max_sessions must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Keyed storage of session histories
///
/// `update` must run the closure while holding exclusive access to that
/// session, so a turn's append and trend evaluation are atomic with respect
/// to other turns of the same session.
pub trait SessionStore: Send + Sync {
    /// Apply `f` to the session's history, creating it on first use
    fn update(&self, session_id: &str, f: &mut dyn FnMut(&mut SessionHistory));

    /// Snapshot of a session's retained turns
    fn history(&self, session_id: &str) -> Option<Vec<SessionRecord>>;

    fn remove(&self, session_id: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop sessions past the idle timeout. Returns how many were removed.
    fn evict_idle(&self) -> usize;
}

/// Concurrent in-process store backed by DashMap
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionHistory>,
    policy: SessionPolicy,
}

impl InMemorySessionStore {
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            sessions: DashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Evict the least recently active session if a new one would exceed the cap
    fn make_room_for(&self, session_id: &str) {
        let Some(max) = self.policy.max_sessions else {
            return;
        };
        if self.sessions.len() < max || self.sessions.contains_key(session_id) {
            return;
        }

        let oldest = self
            .sessions
            .iter()
            .min_by_key(|entry| entry.value().last_activity())
            .map(|entry| entry.key().clone());

        if let Some(oldest) = oldest {
            if self.sessions.remove(&oldest).is_some() {
                tracing::debug!(session_id = %oldest, max_sessions = max, "Evicted least recently active session");
            }
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(SessionPolicy::default())
    }
}

impl SessionStore for InMemorySessionStore {
    fn update(&self, session_id: &str, f: &mut dyn FnMut(&mut SessionHistory)) {
        self.make_room_for(session_id);

        let window = self.policy.history_window;
        let mut entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id, "Tracking new session");
                SessionHistory::new(window)
            });
        f(entry.value_mut());
    }

    fn history(&self, session_id: &str) -> Option<Vec<SessionRecord>> {
        self.sessions.get(session_id).map(|h| h.to_vec())
    }

    fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }

    fn evict_idle(&self) -> usize {
        let Some(timeout_minutes) = self.policy.idle_timeout_minutes else {
            return 0;
        };

        let now = Utc::now();
        let expired: Vec<String> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().is_idle(timeout_minutes, now))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed_count = 0;
        for session_id in expired {
            // Re-check under the entry lock; a turn may have landed since the scan
            if self
                .sessions
                .remove_if(&session_id, |_, h| h.is_idle(timeout_minutes, now))
                .is_some()
            {
                removed_count += 1;
                tracing::debug!(session_id = %session_id, "Removed idle session");
            }
        }

        if removed_count > 0 {
            tracing::info!(
                removed = removed_count,
                active = self.sessions.len(),
                "Cleaned up idle sessions"
            );
        }

        removed_count
    }
}

/// Periodically run `evict_idle` on the current tokio runtime
pub fn spawn_cleanup_task(store: Arc<dyn SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(every);
        loop {
            interval.tick().await;
            store.evict_idle();
        }
    })
}
