//! Comprehensive error types for bundler operations.
//!
//! This module defines the top-level error types surfaced by the CLI and the
//! library entry points, with actionable error messages.

use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all bundler operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            BundlerError::Bundler(crate::bundler::Error::FileFailed { .. }) => vec![
                "Check the loader named in the message and its options in .npmbundlerrc".to_string(),
                "Files processed before the failure were left in the output directory".to_string(),
            ],
            BundlerError::Bundler(crate::bundler::Error::Config(_)) | BundlerError::Json(_) => {
                vec!["Check .npmbundlerrc and package.json for syntax errors".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
