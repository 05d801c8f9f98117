// Crisis detector
//
// Runs the three channel matchers, fuses their scores, classifies the level,
// folds in the session trend and attaches resources.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::classifier::classify;
use super::fusion::fuse;
use super::matcher::{scan_dialect, scan_lexicon, scan_patterns, ChannelResult};
use super::resources::{resolve, ResourceBundle};
use super::response::{compose, prompt_advisory, ResponseTemplate};
use super::tables::CrisisTables;
use super::types::{CrisisLevel, CrisisType};
use crate::config::{load_config_file, EngineConfig};
use crate::errors::CrisisResult;
use crate::session::{InMemorySessionStore, SessionRecord, SessionSignal, SessionStore, SessionTracker};

/// What each channel matched, for audit and debugging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub type_scores: BTreeMap<CrisisType, f64>,
    pub keywords: Vec<String>,
    pub patterns: Vec<String>,
    pub dialect: Vec<String>,
    /// Classifier rule that decided the level; `None` for the low fallback
    pub rule: Option<String>,
}

/// Per-turn result handed back to the conversational pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub crisis_level: CrisisLevel,
    pub total_score: f64,
    pub detected_types: Vec<CrisisType>,
    pub requires_escalation: bool,
    pub requires_immediate_intervention: bool,
    pub session_pattern_risk: f64,
    pub session_signal: SessionSignal,
    pub emergency_resources: ResourceBundle,
    pub evidence: Evidence,
}

impl Assessment {
    fn quiet() -> Self {
        Self {
            crisis_level: CrisisLevel::Low,
            total_score: 0.0,
            detected_types: Vec::new(),
            requires_escalation: false,
            requires_immediate_intervention: false,
            session_pattern_risk: 0.0,
            session_signal: SessionSignal::Stable,
            emergency_resources: resolve(&[]),
            evidence: Evidence::default(),
        }
    }

    pub fn response_template(&self) -> ResponseTemplate {
        ResponseTemplate::select(self.crisis_level, &self.detected_types)
    }

    /// Ready-to-send reply for this turn
    pub fn response(&self) -> &'static str {
        compose(self.crisis_level, &self.detected_types)
    }

    /// Caution line for the response generator's prompt, above low only
    pub fn prompt_advisory(&self) -> Option<String> {
        prompt_advisory(self.crisis_level)
    }
}

#[derive(Clone)]
pub struct CrisisDetector {
    tables: Arc<CrisisTables>,
    config: EngineConfig,
    sessions: SessionTracker,
}

impl CrisisDetector {
    /// Built-in tables plus any configured extras, over an in-memory session store
    pub fn new(config: EngineConfig) -> CrisisResult<Self> {
        let store = Arc::new(InMemorySessionStore::new(config.session));
        Self::with_store(config, store)
    }

    /// Like `new`, but sessions live in a caller-provided store
    pub fn with_store(config: EngineConfig, store: Arc<dyn SessionStore>) -> CrisisResult<Self> {
        let tables = build_tables(CrisisTables::builtin()?, &config)?;
        Self::with_tables(tables, config, store)
    }

    /// Use exactly these tables; configured extras are not applied
    pub fn with_tables(
        tables: CrisisTables,
        config: EngineConfig,
        store: Arc<dyn SessionStore>,
    ) -> CrisisResult<Self> {
        config.validate()?;
        let sessions = SessionTracker::new(store, config.escalation);

        tracing::info!(
            keywords = tables.lexicon.len(),
            patterns = tables.patterns.len(),
            dialect = tables.dialect.len(),
            "Crisis detection system initialized"
        );

        Ok(Self {
            tables: Arc::new(tables),
            config,
            sessions,
        })
    }

    /// Load settings from a TOML file and build the detector
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config = load_config_file(path)
            .with_context(|| format!("Failed to read crisis config: {}", path.display()))?;
        Self::new(config).context("Failed to build crisis detector")
    }

    /// Assess one utterance. With a session id the turn is also recorded and
    /// the session trend is reported.
    pub fn assess(&self, text: &str, session_id: Option<&str>) -> Assessment {
        let mut assessment = self.assess_text(text);

        if let Some(session_id) = session_id {
            let observation = self.sessions.observe(
                session_id,
                SessionRecord::new(assessment.total_score, assessment.detected_types.clone()),
            );
            assessment.session_pattern_risk = observation.risk;
            assessment.session_signal = observation.signal;
        }

        if assessment.requires_escalation {
            tracing::warn!(
                level = %assessment.crisis_level,
                score = assessment.total_score,
                types = ?assessment.detected_types,
                session_id = session_id.unwrap_or("-"),
                session_risk = assessment.session_pattern_risk,
                "Crisis detected"
            );
        }

        assessment
    }

    /// Stateless assessment: level, score, types and resources only
    pub fn assess_text(&self, text: &str) -> Assessment {
        if text.trim().is_empty() {
            return Assessment::quiet();
        }

        let text_lower = text.to_lowercase();
        let lexicon = scan_lexicon(&self.tables.lexicon, &text_lower);
        let patterns = scan_patterns(&self.tables.patterns, &text_lower);
        let dialect = scan_dialect(
            &self.tables.dialect,
            &text_lower,
            self.config.dialect_match_weight,
        );
        log_channel(&lexicon);
        log_channel(&patterns);
        log_channel(&dialect);

        let fused = fuse(&self.config.fusion, &lexicon, &patterns, &dialect);
        let classification = classify(&self.config.thresholds, &fused);
        let level = classification.level;

        Assessment {
            crisis_level: level,
            total_score: fused.total_score,
            requires_escalation: level.requires_escalation(),
            requires_immediate_intervention: level.requires_immediate_intervention(),
            session_pattern_risk: 0.0,
            session_signal: SessionSignal::Stable,
            emergency_resources: resolve(&fused.detected_types),
            evidence: Evidence {
                type_scores: fused.scores.clone(),
                keywords: lexicon.matched_texts(),
                patterns: patterns.matched_texts(),
                dialect: dialect.matched_texts(),
                rule: classification.rule.map(str::to_string),
            },
            detected_types: fused.detected_types,
        }
    }

    /// Quick check: does this text alone warrant escalation?
    pub fn detect_crisis(&self, text: &str) -> bool {
        self.assess_text(text).requires_escalation
    }

    /// Reply text for an assessment
    pub fn generate_response(&self, assessment: &Assessment) -> &'static str {
        assessment.response()
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub fn tables(&self) -> &CrisisTables {
        &self.tables
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn log_channel(result: &ChannelResult) {
    if !result.is_empty() {
        tracing::debug!(
            channel = ?result.channel,
            scores = ?result.scores,
            matches = result.matches.len(),
            "Channel matched"
        );
    }
}

/// Merge configured extras into the tables. Unknown type names are skipped.
fn build_tables(mut tables: CrisisTables, config: &EngineConfig) -> CrisisResult<CrisisTables> {
    for (name, keywords) in &config.extra_keywords {
        match CrisisType::from_name_lenient(name) {
            Some(t) => tables.lexicon.extend(t, keywords),
            None => tracing::warn!(crisis_type = %name, "Skipping keywords for unknown crisis type"),
        }
    }

    for (name, idioms) in &config.extra_dialect {
        match CrisisType::from_name_lenient(name) {
            Some(t) => tables.dialect.extend(t, idioms),
            None => tracing::warn!(crisis_type = %name, "Skipping idioms for unknown crisis type"),
        }
    }

    for extra in &config.extra_patterns {
        match CrisisType::from_name_lenient(&extra.crisis_type) {
            Some(t) => tables = tables.with_pattern(&extra.pattern, t, extra.weight)?,
            None => tracing::warn!(
                crisis_type = %extra.crisis_type,
                pattern = %extra.pattern,
                "Skipping pattern for unknown crisis type"
            ),
        }
    }

    Ok(tables)
}
