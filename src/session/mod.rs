// Session module
// Per-session escalation tracking over an injectable store

mod history;
mod store;
mod tracker;

pub use history::{
    EscalationPolicy, SessionHistory, SessionRecord, SessionSignal, MAX_HISTORY_WINDOW,
};
pub use store::{spawn_cleanup_task, InMemorySessionStore, SessionPolicy, SessionStore};
pub use tracker::{SessionObservation, SessionTracker};
