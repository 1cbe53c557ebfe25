//! Error types for store operations

use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

/// Main error type for store operations.
///
/// Messages double as the user-visible failure reason.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("{id} Not Found")]
    NotFound { id: String },

    #[error("{tag} Disabled")]
    Disabled { tag: String },

    #[error("{tag} is already refreshing")]
    RefreshInProgress { id: String, tag: String },

    #[error("Duplicate id: {id}")]
    DuplicateId { id: String },

    #[error("{0}")]
    Validation(String),

    #[error("Source ruleset file not exists {path}")]
    SourceMissing { path: String },

    #[error("Ruleset file not downloaded {url}")]
    DownloadIncomplete { url: String },

    #[error("Failed to persist {path}: {reason}")]
    Persistence { path: String, reason: String },

    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn io(path: &Path, err: impl Display) -> Self {
        Self::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn persistence(path: &Path, err: impl Display) -> Self {
        Self::Persistence {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn download(url: &str, err: impl Display) -> Self {
        Self::Download {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }

    /// Short machine-friendly name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "not_found",
            StoreError::Disabled { .. } => "disabled",
            StoreError::RefreshInProgress { .. } => "refresh_in_progress",
            StoreError::DuplicateId { .. } => "duplicate_id",
            StoreError::Validation(_) => "validation",
            StoreError::SourceMissing { .. } => "source_missing",
            StoreError::DownloadIncomplete { .. } => "download_incomplete",
            StoreError::Persistence { .. } => "persistence",
            StoreError::Io { .. } => "io",
            StoreError::Download { .. } => "download",
            StoreError::Serialization(_) => "serialization",
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
