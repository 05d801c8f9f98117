// Session tracker
// Records each assessed turn and derives the escalation-risk adjustment

use std::sync::Arc;

use super::history::{EscalationPolicy, SessionRecord, SessionSignal};
use super::store::{InMemorySessionStore, SessionStore};

/// Outcome of recording one turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionObservation {
    pub signal: SessionSignal,
    pub risk: f64,
    pub history_len: usize,
}

#[derive(Clone)]
pub struct SessionTracker {
    store: Arc<dyn SessionStore>,
    policy: EscalationPolicy,
}

impl SessionTracker {
    pub fn new(store: Arc<dyn SessionStore>, policy: EscalationPolicy) -> Self {
        Self { store, policy }
    }

    /// Tracker over a fresh unbounded in-memory store
    pub fn in_memory(policy: EscalationPolicy) -> Self {
        Self::new(Arc::new(InMemorySessionStore::default()), policy)
    }

    /// Append a turn to the session and evaluate its trend in one atomic update
    pub fn observe(&self, session_id: &str, record: SessionRecord) -> SessionObservation {
        let mut pending = Some(record);
        let mut observation = SessionObservation {
            signal: SessionSignal::Stable,
            risk: 0.0,
            history_len: 0,
        };

        self.store.update(session_id, &mut |history| {
            if let Some(record) = pending.take() {
                history.push(record);
            }
            let signal = history.signal(&self.policy);
            observation = SessionObservation {
                signal,
                risk: self.policy.risk(signal),
                history_len: history.len(),
            };
        });

        if observation.signal != SessionSignal::Stable {
            tracing::info!(
                session_id,
                signal = ?observation.signal,
                risk = observation.risk,
                "Session trend detected"
            );
        }

        observation
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn policy(&self) -> &EscalationPolicy {
        &self.policy
    }

    /// Forget a session, e.g. when the conversation ends
    pub fn end_session(&self, session_id: &str) -> bool {
        self.store.remove(session_id)
    }
}
