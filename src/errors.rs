// Engine error types
//
// Construction-time faults (bad regex, bad weights, unreadable config) are
// reported through CrisisError. Assessment itself never fails.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type CrisisResult<T> = std::result::Result<T, CrisisError>;

#[derive(Debug, Error)]
pub enum CrisisError {
    /// A pattern in the pattern table failed to compile
    #[error("invalid crisis pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A weight or threshold was negative, zero where it must be positive, or not finite
    #[error("invalid weight for {name}: {value}")]
    InvalidWeight { name: String, value: f64 },

    /// Configuration file could not be parsed or failed validation
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CrisisError {
    pub fn invalid_weight(name: impl Into<String>, value: f64) -> Self {
        CrisisError::InvalidWeight {
            name: name.into(),
            value,
        }
    }
}

/// Check that a weight is finite and strictly positive
pub(crate) fn ensure_positive(name: &str, value: f64) -> CrisisResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CrisisError::invalid_weight(name, value))
    }
}

/// Check that a weight is finite and not negative
pub(crate) fn ensure_non_negative(name: &str, value: f64) -> CrisisResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CrisisError::invalid_weight(name, value))
    }
}

/// Format a config parse error with helpful suggestions
pub fn config_parse_error(path: &str, error: impl fmt::Display) -> String {
    format!(
        "Failed to parse config file {}\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check config file syntax:\n\
           \x1b[36mcat {}\x1b[0m\n\n\
        2. Remove the file to fall back to built-in defaults\n\n\
        3. Common mistakes:\n\
           • Unknown crisis type in [extra_keywords]\n\
           • Negative fusion weight\n\
           • Unescaped backslash in a regex pattern (use single quotes)",
        path, error, path
    )
}
