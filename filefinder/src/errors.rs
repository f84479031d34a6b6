/// This module defines the error types for filefinder.
///
/// # Fatal vs. per-item errors
///
/// Not every error ends a run. The traversal engine and the deletion planner
/// treat some failures as local to one item:
///
/// ```rust,ignore
/// match engine.search(&criteria) {
///     Ok(outcome) => // Unreadable subdirectories were skipped, not reported here
///     Err(FinderError::DirectoryUnreadable { path, .. }) => // The root itself failed
///     Err(e) => // Invalid criteria, bad size string, ...
/// }
/// ```
///
/// Deletion failures never come back through `Err`; they are collected in
/// [`crate::delete::DeletionReport::failures`] so the remaining files can still
/// be processed.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for filefinder operations
pub type FinderResult<T> = Result<T, FinderError>;

/// Errors that can occur while searching for or removing files
#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Cannot read directory {path}: {source}")]
    DirectoryUnreadable { path: PathBuf, source: io::Error },
    #[error("Invalid file size: {0}")]
    SizeParse(String),
    #[error("Failed to delete {path}: {source}")]
    DeletionFailure { path: PathBuf, source: io::Error },
    #[error("Invalid {kind}: {value}")]
    InvalidFilterValue { kind: &'static str, value: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl FinderError {
    pub fn directory_unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::DirectoryUnreadable {
            path: path.into(),
            source,
        }
    }

    pub fn size_parse(msg: impl Into<String>) -> Self {
        Self::SizeParse(msg.into())
    }

    pub fn deletion_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::DeletionFailure {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_filter_value(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidFilterValue {
            kind,
            value: value.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// True for errors that abort a run before any traversal happens
    pub fn is_criteria_error(&self) -> bool {
        matches!(
            self,
            Self::SizeParse(_) | Self::InvalidFilterValue { .. } | Self::ConfigError(_)
        )
    }
}

impl From<config::ConfigError> for FinderError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
