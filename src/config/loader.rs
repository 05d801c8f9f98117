// Configuration loader
// Loads engine settings from an explicit path or ~/.sanad/config.toml

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::EngineConfig;
use crate::errors::{config_parse_error, CrisisError, CrisisResult};

/// Default config location, if a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sanad/config.toml"))
}

/// Load configuration.
///
/// An explicit path must exist. Without one, `~/.sanad/config.toml` is used
/// when present, otherwise the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => path,
            None => {
                tracing::debug!("No config file found, using built-in defaults");
                return Ok(EngineConfig::default());
            }
        },
    };

    let config = load_config_file(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    tracing::info!(path = %path.display(), "Loaded engine config");
    Ok(config)
}

pub fn load_config_file(path: &Path) -> CrisisResult<EngineConfig> {
    let contents = fs::read_to_string(path).map_err(|source| CrisisError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&contents)
        .map_err(|e| CrisisError::Config(config_parse_error(&path.display().to_string(), e)))
}

/// Parse and validate TOML config text
pub fn parse_config(contents: &str) -> CrisisResult<EngineConfig> {
    let config: EngineConfig =
        toml::from_str(contents).map_err(|e| CrisisError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r#"
            dialect_match_weight = 1.5

            [fusion]
            pattern = 0.6

            [session]
            max_sessions = 1000
            idle_timeout_minutes = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.fusion.pattern, 0.6);
        assert_eq!(config.fusion.lexicon, 0.3);
        assert_eq!(config.dialect_match_weight, 1.5);
        assert_eq!(config.session.history_window, 10);
        assert_eq!(config.session.max_sessions, Some(1000));
        assert_eq!(config.session.idle_timeout_minutes, Some(60));
    }

    #[test]
    fn test_extra_tables() {
        let config = parse_config(
            r#"
            [extra_keywords]
            suicide = ["ودي أموت"]

            [[extra_patterns]]
            pattern = '(بطلع|بروح).*(للأبد)'
            crisis_type = "suicide"
            weight = 0.7
            "#,
        )
        .unwrap();

        assert_eq!(config.extra_keywords["suicide"], vec!["ودي أموت"]);
        assert_eq!(config.extra_patterns.len(), 1);
        assert_eq!(config.extra_patterns[0].weight, 0.7);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse_config("[fusion]\nlexicon = -0.3").is_err());
        assert!(parse_config("[session]\nhistory_window = 0").is_err());
        assert!(parse_config("fusion = 3").is_err());
    }
}
