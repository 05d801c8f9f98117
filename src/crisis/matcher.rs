// Channel matchers: lexicon, regex pattern and dialect idiom scans
//
// Every matcher is a pure function of the (lowercased) text and its table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::tables::{PatternEntry, PhraseTable};
use super::types::CrisisType;

/// Each distinct lexicon keyword present scores this much
pub const LEXICON_MATCH_SCORE: f64 = 1.0;

/// Default score for each distinct dialect idiom present
pub const DIALECT_MATCH_SCORE: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Lexicon,
    Pattern,
    Dialect,
}

/// A literal substring one channel matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMatch {
    pub crisis_type: CrisisType,
    pub text: String,
}

/// Raw per-type scores from one channel. Types with no match are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelResult {
    pub channel: Channel,
    pub scores: BTreeMap<CrisisType, f64>,
    pub matches: Vec<ChannelMatch>,
}

impl ChannelResult {
    fn new(channel: Channel) -> Self {
        Self {
            channel,
            scores: BTreeMap::new(),
            matches: Vec::new(),
        }
    }

    pub fn score(&self, crisis_type: CrisisType) -> f64 {
        self.scores.get(&crisis_type).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Matched substrings, in scan order
    pub fn matched_texts(&self) -> Vec<String> {
        self.matches.iter().map(|m| m.text.clone()).collect()
    }

    fn add(&mut self, crisis_type: CrisisType, score: f64, text: &str) {
        *self.scores.entry(crisis_type).or_insert(0.0) += score;
        self.matches.push(ChannelMatch {
            crisis_type,
            text: text.to_string(),
        });
    }
}

/// Score text against a phrase table. Each distinct phrase found adds `per_match`.
fn scan_phrases(channel: Channel, table: &PhraseTable, text: &str, per_match: f64) -> ChannelResult {
    let mut result = ChannelResult::new(channel);
    if per_match <= 0.0 {
        return result;
    }

    for (crisis_type, phrases) in table.iter() {
        for phrase in phrases {
            if text.contains(phrase.as_str()) {
                result.add(crisis_type, per_match, phrase);
            }
        }
    }

    result
}

/// Standard-register keyword channel
pub fn scan_lexicon(table: &PhraseTable, text: &str) -> ChannelResult {
    scan_phrases(Channel::Lexicon, table, text, LEXICON_MATCH_SCORE)
}

/// Omani dialect idiom channel
pub fn scan_dialect(table: &PhraseTable, text: &str, per_match: f64) -> ChannelResult {
    scan_phrases(Channel::Dialect, table, text, per_match)
}

/// Regex channel: non-overlapping match count times weight, accumulated per type
pub fn scan_patterns(patterns: &[PatternEntry], text: &str) -> ChannelResult {
    let mut result = ChannelResult::new(Channel::Pattern);

    for entry in patterns {
        for found in entry.regex.find_iter(text) {
            result.add(entry.crisis_type, entry.weight, found.as_str());
        }
    }

    result
}
