//! rulesetctl error types

use ruleset_store::StoreError;
use settings_common::LabelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid configuration {key}: {reason}")]
    Config { key: String, reason: String },

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Label table error: {0}")]
    Labels(#[from] LabelError),

    #[error("Ruleset {0} not found")]
    UnknownRuleset(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CliError {
    pub fn config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for rulesetctl operations
pub type CliResult<T> = Result<T, CliError>;
