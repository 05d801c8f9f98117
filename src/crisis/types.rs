// Crisis categories and severity levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of mental-health emergency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisType {
    Suicide,
    SelfHarm,
    Violence,
    SevereDepression,
    Psychosis,
    SubstanceAbuse,
    EatingDisorder,
}

impl CrisisType {
    pub const ALL: [CrisisType; 7] = [
        CrisisType::Suicide,
        CrisisType::SelfHarm,
        CrisisType::Violence,
        CrisisType::SevereDepression,
        CrisisType::Psychosis,
        CrisisType::SubstanceAbuse,
        CrisisType::EatingDisorder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CrisisType::Suicide => "suicide",
            CrisisType::SelfHarm => "self_harm",
            CrisisType::Violence => "violence",
            CrisisType::SevereDepression => "severe_depression",
            CrisisType::Psychosis => "psychosis",
            CrisisType::SubstanceAbuse => "substance_abuse",
            CrisisType::EatingDisorder => "eating_disorder",
        }
    }

    /// Parse a type name received across a string boundary.
    ///
    /// Unknown names yield `None`; callers treat that as "no type-specific
    /// handling" instead of failing.
    pub fn from_name_lenient(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Position in `ALL`, used to index per-type arrays
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CrisisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCrisisType(pub String);

impl fmt::Display for UnknownCrisisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown crisis type '{}'", self.0)
    }
}

impl std::error::Error for UnknownCrisisType {}

impl FromStr for CrisisType {
    type Err = UnknownCrisisType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        CrisisType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnknownCrisisType(s.to_string()))
    }
}

/// Ordinal crisis severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl CrisisLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrisisLevel::Low => "low",
            CrisisLevel::Medium => "medium",
            CrisisLevel::High => "high",
            CrisisLevel::Critical => "critical",
        }
    }

    /// High and critical turns must surface resources
    pub fn requires_escalation(&self) -> bool {
        *self >= CrisisLevel::High
    }

    pub fn requires_immediate_intervention(&self) -> bool {
        *self == CrisisLevel::Critical
    }
}

impl fmt::Display for CrisisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
