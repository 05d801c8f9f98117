// Score fusion
// Weighted combination of the three channel results into per-type scores

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::matcher::ChannelResult;
use super::types::CrisisType;
use crate::errors::{ensure_non_negative, CrisisResult};

/// Per-channel fusion weights
///
/// Changing these shifts every classification boundary; re-run the
/// scenario tests after any rebalancing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub lexicon: f64,
    pub pattern: f64,
    pub dialect: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            lexicon: 0.3,
            pattern: 0.5,
            dialect: 0.4,
        }
    }
}

impl FusionWeights {
    pub fn validate(&self) -> CrisisResult<()> {
        ensure_non_negative("fusion.lexicon", self.lexicon)?;
        ensure_non_negative("fusion.pattern", self.pattern)?;
        ensure_non_negative("fusion.dialect", self.dialect)?;
        Ok(())
    }
}

/// Combined evidence for one utterance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusedScore {
    pub scores: BTreeMap<CrisisType, f64>,
    pub total_score: f64,
    /// Types with a positive combined score, in `CrisisType` order
    pub detected_types: Vec<CrisisType>,
}

impl FusedScore {
    pub fn contains(&self, crisis_type: CrisisType) -> bool {
        self.detected_types.contains(&crisis_type)
    }

    pub fn score(&self, crisis_type: CrisisType) -> f64 {
        self.scores.get(&crisis_type).copied().unwrap_or(0.0)
    }
}

/// Fuse the lexicon, pattern and dialect results
pub fn fuse(
    weights: &FusionWeights,
    lexicon: &ChannelResult,
    pattern: &ChannelResult,
    dialect: &ChannelResult,
) -> FusedScore {
    let mut fused = FusedScore::default();

    for crisis_type in CrisisType::ALL {
        let combined = weights.lexicon * lexicon.score(crisis_type)
            + weights.pattern * pattern.score(crisis_type)
            + weights.dialect * dialect.score(crisis_type);

        if combined > 0.0 {
            fused.scores.insert(crisis_type, combined);
            fused.detected_types.push(crisis_type);
            fused.total_score += combined;
        }
    }

    fused
}
