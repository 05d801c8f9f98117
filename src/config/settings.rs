// Configuration structs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::crisis::{FusionWeights, LevelThresholds, DIALECT_MATCH_SCORE};
use crate::errors::{ensure_non_negative, CrisisError, CrisisResult};
use crate::session::{EscalationPolicy, SessionPolicy};

/// A deployment-specific regex added to the built-in pattern table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraPattern {
    pub pattern: String,
    /// Crisis type name, e.g. "suicide"
    pub crisis_type: String,
    pub weight: f64,
}

/// Tunable engine parameters. Every field has a default matching the
/// built-in calibration, so a partial file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fusion: FusionWeights,
    pub thresholds: LevelThresholds,
    /// Score added per distinct dialect idiom found
    pub dialect_match_weight: f64,
    pub escalation: EscalationPolicy,
    pub session: SessionPolicy,

    /// Extra keywords by crisis type name
    pub extra_keywords: BTreeMap<String, Vec<String>>,
    /// Extra dialect idioms by crisis type name
    pub extra_dialect: BTreeMap<String, Vec<String>>,
    pub extra_patterns: Vec<ExtraPattern>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fusion: FusionWeights::default(),
            thresholds: LevelThresholds::default(),
            dialect_match_weight: DIALECT_MATCH_SCORE,
            escalation: EscalationPolicy::default(),
            session: SessionPolicy::default(),
            extra_keywords: BTreeMap::new(),
            extra_dialect: BTreeMap::new(),
            extra_patterns: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Reject weights and windows that would break the scoring invariants
    pub fn validate(&self) -> CrisisResult<()> {
        self.fusion.validate()?;
        self.thresholds.validate()?;
        ensure_non_negative("dialect_match_weight", self.dialect_match_weight)?;
        self.escalation.validate()?;
        self.session.validate()?;
        if self.escalation.trend_length > self.session.history_window {
            return Err(CrisisError::Config(format!(
                "escalation.trend_length ({}) exceeds session.history_window ({})",
                self.escalation.trend_length, self.session.history_window
            )));
        }
        Ok(())
    }
}
