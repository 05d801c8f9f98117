// Sanad - Crisis detection for Arabic mental-health conversations
// Library exports

pub mod config;
pub mod crisis; // Channel matching, fusion, classification, resources
pub mod errors;
pub mod session; // Per-session escalation tracking

pub use config::{load_config, EngineConfig};
pub use crisis::{Assessment, CrisisDetector, CrisisLevel, CrisisType};
pub use errors::{CrisisError, CrisisResult};
