//! Engine error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The rules file exists but could not be read.
    #[error("failed to read rules file {}", path.display())]
    RulesIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rules file exists but is not valid TOML for the expected shape.
    ///
    /// A present-but-broken file is an error rather than a silent fall
    /// back to defaults: the operator asked for these rules.
    #[error("malformed rules file {}", path.display())]
    RulesParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A rule range with min >= max or non-positive bounds.
    #[error("invalid rule range for {what}: min {min}, max {max}")]
    InvalidRuleRange { what: String, min: f64, max: f64 },

    #[error(transparent)]
    Core(#[from] cnc_core::CoreError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
