// Configuration module
// Public interface for configuration loading

mod loader;
mod settings;

pub use loader::{default_config_path, load_config, load_config_file, parse_config};
pub use settings::{EngineConfig, ExtraPattern};
