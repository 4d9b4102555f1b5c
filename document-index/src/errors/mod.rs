//! Error types for the document index command line.

use document_index_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur during initialization or command execution.
///
/// Argument errors are reported by `clap` before any of these can occur.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Input that parsed as JSON but does not fit the command.
    #[error("Invalid input: {0}")]
    InputError(String),

    /// A command result could not be rendered as JSON.
    #[error("Output error: {0}")]
    OutputError(#[from] serde_json::Error),

    /// Error from the search index.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] SearchIndexError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an input error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::InputError(msg.into())
    }
}
