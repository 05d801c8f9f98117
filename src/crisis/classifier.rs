// Level classifier
//
// An ordered decision list: the first rule whose guard holds decides the
// level. Rule order is part of the behavior.

use serde::{Deserialize, Serialize};

use super::fusion::FusedScore;
use super::types::{CrisisLevel, CrisisType};
use crate::errors::{ensure_non_negative, CrisisResult};

/// Score cut-offs for each rule. All comparisons are inclusive (`>=`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
    pub critical: f64,
    pub critical_suicide: f64,
    pub critical_violence: f64,
    pub high: f64,
    pub high_self_harm: f64,
    pub medium: f64,
    pub medium_depression: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            critical: 3.0,
            critical_suicide: 2.0,
            critical_violence: 2.5,
            high: 2.0,
            high_self_harm: 1.0,
            medium: 1.0,
            medium_depression: 0.5,
        }
    }
}

impl LevelThresholds {
    pub fn validate(&self) -> CrisisResult<()> {
        for (name, value) in [
            ("thresholds.critical", self.critical),
            ("thresholds.critical_suicide", self.critical_suicide),
            ("thresholds.critical_violence", self.critical_violence),
            ("thresholds.high", self.high),
            ("thresholds.high_self_harm", self.high_self_harm),
            ("thresholds.medium", self.medium),
            ("thresholds.medium_depression", self.medium_depression),
        ] {
            ensure_non_negative(name, value)?;
        }
        Ok(())
    }

    /// The decision list, in evaluation order
    pub fn rules(&self) -> [LevelRule; 7] {
        use CrisisType::*;
        [
            LevelRule::new("total_critical", CrisisLevel::Critical, self.critical, &[]),
            LevelRule::new(
                "suicide_critical",
                CrisisLevel::Critical,
                self.critical_suicide,
                &[Suicide],
            ),
            LevelRule::new(
                "violence_critical",
                CrisisLevel::Critical,
                self.critical_violence,
                &[Violence],
            ),
            LevelRule::new("total_high", CrisisLevel::High, self.high, &[]),
            LevelRule::new(
                "self_harm_high",
                CrisisLevel::High,
                self.high_self_harm,
                &[Suicide, SelfHarm],
            ),
            LevelRule::new("total_medium", CrisisLevel::Medium, self.medium, &[]),
            LevelRule::new(
                "depression_medium",
                CrisisLevel::Medium,
                self.medium_depression,
                &[SevereDepression],
            ),
        ]
    }
}

/// One guard in the decision list
#[derive(Debug, Clone, Copy)]
pub struct LevelRule {
    pub name: &'static str,
    pub level: CrisisLevel,
    pub min_total: f64,
    /// Any of these types must be detected; empty means no type guard
    pub any_of: &'static [CrisisType],
}

impl LevelRule {
    const fn new(
        name: &'static str,
        level: CrisisLevel,
        min_total: f64,
        any_of: &'static [CrisisType],
    ) -> Self {
        Self {
            name,
            level,
            min_total,
            any_of,
        }
    }

    pub fn matches(&self, fused: &FusedScore) -> bool {
        fused.total_score >= self.min_total
            && (self.any_of.is_empty() || self.any_of.iter().any(|t| fused.contains(*t)))
    }
}

/// Level plus the rule that produced it (`None` means the low fallback)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub level: CrisisLevel,
    pub rule: Option<&'static str>,
}

pub fn classify(thresholds: &LevelThresholds, fused: &FusedScore) -> Classification {
    thresholds
        .rules()
        .iter()
        .find(|rule| rule.matches(fused))
        .map(|rule| Classification {
            level: rule.level,
            rule: Some(rule.name),
        })
        .unwrap_or(Classification {
            level: CrisisLevel::Low,
            rule: None,
        })
}
