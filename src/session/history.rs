// Per-session score history and escalation signals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::crisis::CrisisType;
use crate::errors::{ensure_non_negative, CrisisError, CrisisResult};

/// Most turns a session ever retains
pub const MAX_HISTORY_WINDOW: usize = 10;

/// One assessed turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub timestamp: DateTime<Utc>,
    pub total_score: f64,
    pub detected_types: Vec<CrisisType>,
}

impl SessionRecord {
    pub fn new(total_score: f64, detected_types: Vec<CrisisType>) -> Self {
        Self {
            timestamp: Utc::now(),
            total_score,
            detected_types,
        }
    }
}

/// Trend observed across a session's retained turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSignal {
    /// The most recent scores are strictly increasing
    Escalating,
    /// Several retained turns scored above the persistence threshold
    Persistent,
    Stable,
}

/// How session trends turn into a risk adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationPolicy {
    /// Number of trailing turns that must strictly increase
    pub trend_length: usize,
    pub escalating_risk: f64,
    pub persistent_risk: f64,
    /// A turn counts toward persistence when its score is strictly above this
    pub persistent_score_threshold: f64,
    pub persistent_min_count: usize,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            trend_length: 3,
            escalating_risk: 0.5,
            persistent_risk: 0.3,
            persistent_score_threshold: 1.0,
            persistent_min_count: 2,
        }
    }
}

impl EscalationPolicy {
    pub fn validate(&self) -> CrisisResult<()> {
        if self.trend_length < 2 {
            return Err(CrisisError::Config(
                "escalation.trend_length must be at least 2".to_string(),
            ));
        }
        if self.persistent_min_count == 0 {
            return Err(CrisisError::Config(
                "escalation.persistent_min_count must be at least 1".to_string(),
            ));
        }
        ensure_non_negative("escalation.escalating_risk", self.escalating_risk)?;
        ensure_non_negative("escalation.persistent_risk", self.persistent_risk)?;
        ensure_non_negative(
            "escalation.persistent_score_threshold",
            self.persistent_score_threshold,
        )?;
        Ok(())
    }

    pub fn risk(&self, signal: SessionSignal) -> f64 {
        match signal {
            SessionSignal::Escalating => self.escalating_risk,
            SessionSignal::Persistent => self.persistent_risk,
            SessionSignal::Stable => 0.0,
        }
    }
}

/// Bounded window of the most recent turns for one session
#[derive(Debug, Clone)]
pub struct SessionHistory {
    records: VecDeque<SessionRecord>,
    window_size: usize,
    last_activity: DateTime<Utc>,
}

impl SessionHistory {
    /// Window sizes are clamped to `1..=MAX_HISTORY_WINDOW`
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.clamp(1, MAX_HISTORY_WINDOW);
        Self {
            records: VecDeque::with_capacity(window_size),
            window_size,
            last_activity: Utc::now(),
        }
    }

    /// Append a turn, evicting the oldest once the window is full
    pub fn push(&mut self, record: SessionRecord) {
        while self.records.len() >= self.window_size {
            self.records.pop_front();
        }
        self.last_activity = record.timestamp.max(self.last_activity);
        self.records.push_back(record);
    }

    /// Evaluate the retained turns. Escalation is checked before persistence
    /// and only one signal is reported.
    pub fn signal(&self, policy: &EscalationPolicy) -> SessionSignal {
        if self.is_escalating(policy.trend_length) {
            return SessionSignal::Escalating;
        }

        let above = self
            .records
            .iter()
            .filter(|r| r.total_score > policy.persistent_score_threshold)
            .count();
        if above >= policy.persistent_min_count {
            return SessionSignal::Persistent;
        }

        SessionSignal::Stable
    }

    fn is_escalating(&self, trend_length: usize) -> bool {
        if trend_length < 2 || self.records.len() < trend_length {
            return false;
        }
        let tail: Vec<f64> = self
            .records
            .iter()
            .skip(self.records.len() - trend_length)
            .map(|r| r.total_score)
            .collect();
        tail.windows(2).all(|pair| pair[0] < pair[1])
    }

    pub fn records(&self) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter()
    }

    pub fn to_vec(&self) -> Vec<SessionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Whether the session has been idle for at least `timeout_minutes`
    pub fn is_idle(&self, timeout_minutes: u64, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.last_activity).num_minutes() >= timeout_minutes as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(scores: &[f64]) -> SessionHistory {
        let mut history = SessionHistory::new(10);
        for score in scores {
            history.push(SessionRecord::new(*score, vec![]));
        }
        history
    }

    #[test]
    fn test_window_overflow() {
        let history = history_with(&[0.0; 25]);
        assert_eq!(history.len(), 10);
    }

    #[test]
    fn test_oversized_window_is_clamped() {
        let mut history = SessionHistory::new(50);
        for _ in 0..40 {
            history.push(SessionRecord::new(0.5, vec![]));
        }
        assert_eq!(history.len(), MAX_HISTORY_WINDOW);
    }

    #[test]
    fn test_window_keeps_most_recent() {
        let mut history = SessionHistory::new(3);
        for score in [0.1, 0.2, 0.3, 0.4] {
            history.push(SessionRecord::new(score, vec![]));
        }
        let scores: Vec<f64> = history.records().map(|r| r.total_score).collect();
        assert_eq!(scores, vec![0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_escalating() {
        let policy = EscalationPolicy::default();
        assert_eq!(history_with(&[0.2, 0.6, 1.1]).signal(&policy), SessionSignal::Escalating);
        assert_eq!(
            history_with(&[2.0, 0.0, 0.2, 0.6, 1.1]).signal(&policy),
            SessionSignal::Escalating
        );
    }

    #[test]
    fn test_equal_scores_are_not_escalating() {
        let policy = EscalationPolicy::default();
        assert_eq!(history_with(&[0.2, 0.6, 0.6]).signal(&policy), SessionSignal::Stable);
        assert_eq!(history_with(&[0.9, 0.6, 0.3]).signal(&policy), SessionSignal::Stable);
    }

    #[test]
    fn test_two_turns_not_enough_for_trend() {
        let policy = EscalationPolicy::default();
        assert_eq!(history_with(&[0.2, 0.6]).signal(&policy), SessionSignal::Stable);
    }

    #[test]
    fn test_persistent() {
        let policy = EscalationPolicy::default();
        assert_eq!(history_with(&[1.2, 0.3, 1.5]).signal(&policy), SessionSignal::Persistent);
        // 1.0 is not strictly above the threshold
        assert_eq!(history_with(&[1.0, 0.3, 1.5]).signal(&policy), SessionSignal::Stable);
    }

    #[test]
    fn test_escalation_wins_over_persistence() {
        let policy = EscalationPolicy::default();
        assert_eq!(history_with(&[1.2, 1.5, 1.8]).signal(&policy), SessionSignal::Escalating);
        assert_eq!(policy.risk(SessionSignal::Escalating), 0.5);
    }

    #[test]
    fn test_risk_values() {
        let policy = EscalationPolicy::default();
        assert_eq!(policy.risk(SessionSignal::Persistent), 0.3);
        assert_eq!(policy.risk(SessionSignal::Stable), 0.0);
    }

    #[test]
    fn test_idle_check() {
        let history = SessionHistory::new(10);
        let later = history.last_activity() + chrono::Duration::minutes(31);
        assert!(history.is_idle(30, later));
        assert!(!history.is_idle(30, history.last_activity()));
    }

    #[test]
    fn test_policy_validation() {
        let policy = EscalationPolicy {
            trend_length: 1,
            ..EscalationPolicy::default()
        };
        assert!(policy.validate().is_err());
        assert!(EscalationPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_zero_persistent_count_rejected() {
        let policy = EscalationPolicy {
            persistent_min_count: 0,
            ..EscalationPolicy::default()
        };
        assert!(policy.validate().is_err());
    }
}
