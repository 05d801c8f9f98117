// Crisis detection module
// Channel matching, fusion, classification, resources and replies

mod classifier;
mod detector;
mod fusion;
mod matcher;
mod resources;
mod response;
mod tables;
mod types;

pub use classifier::{classify, Classification, LevelRule, LevelThresholds};
pub use detector::{Assessment, CrisisDetector, Evidence};
pub use fusion::{fuse, FusedScore, FusionWeights};
pub use matcher::{
    scan_dialect, scan_lexicon, scan_patterns, Channel, ChannelMatch, ChannelResult,
    DIALECT_MATCH_SCORE, LEXICON_MATCH_SCORE,
};
pub use resources::{resolve, resolve_names, ResourceBundle, ResourceCategory};
pub use response::{compose, prompt_advisory, ResponseTemplate};
pub use tables::{CrisisTables, PatternEntry, PhraseTable};
pub use types::{CrisisLevel, CrisisType, UnknownCrisisType};
