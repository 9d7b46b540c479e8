//! Error types for the rule-execution engine.
//!
//! Loader failures are annotated with the loader's `use` identifier and then
//! with the file being processed, so a failed build names both. Filesystem
//! errors carry the operation and the path but are otherwise surfaced as-is.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while discovering, transforming or writing package files.
#[derive(Error, Debug)]
pub enum Error {
    /// A loader raised an error; the rest of the chain was not run.
    #[error("Loader '{loader}' failed: {message}")]
    LoaderFailed {
        /// The loader's `use` identifier
        loader: String,
        /// Original error message
        message: String,
    },

    /// Processing a single file failed.
    #[error("failed to process {}: {source}", file.display())]
    FileFailed {
        /// Project-relative path of the file
        file: PathBuf,
        /// Underlying failure
        source: Box<Error>,
    },

    /// Filesystem operation failed.
    #[error("failed {context} {}: {error}", path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        error: std::io::Error,
    },

    /// Raw IO error.
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// Invalid bundler configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Invalid glob pattern.
    #[error("invalid glob pattern '{pattern}': {error}")]
    Pattern {
        /// The offending pattern
        pattern: String,
        /// Parser error
        #[source]
        error: glob::PatternError,
    },

    /// Directory traversal failed.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid rule expression.
    #[error("invalid rule expression: {0}")]
    Regex(#[from] regex::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

/// Adds a human-readable context to an optional value or a foreign error.
pub trait Context<T> {
    /// Converts `None` or an error into [`Error::GenericError`] carrying `context`.
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }
}

/// Attaches the attempted operation and path to IO errors.
pub trait ErrorExt<T> {
    /// Wraps an IO error into [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)).into())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_failed_message() {
        let err = Error::LoaderFailed {
            loader: "uppercase".to_string(),
            message: "unexpected token".to_string(),
        };
        assert_eq!(err.to_string(), "Loader 'uppercase' failed: unexpected token");
    }

    #[test]
    fn test_file_failed_names_file_and_loader() {
        let err = Error::FileFailed {
            file: PathBuf::from("src/index.js"),
            source: Box::new(Error::LoaderFailed {
                loader: "uppercase".to_string(),
                message: "boom".to_string(),
            }),
        };
        let message = err.to_string();
        assert!(message.contains("src/index.js"));
        assert!(message.contains("Loader 'uppercase' failed: boom"));
    }

    #[test]
    fn test_fs_context() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let err = result.fs_context("reading source file", "/project/src/a.js").unwrap_err();
        assert!(matches!(err, Error::Fs { context: "reading source file", .. }));
        assert!(err.to_string().contains("/project/src/a.js"));
    }

    #[test]
    fn test_option_context() {
        let value: Option<u32> = None;
        let err = value.context("project_dir is required").unwrap_err();
        assert_eq!(err.to_string(), "project_dir is required");
    }

    fn bails(flag: bool) -> Result<u32> {
        if flag {
            crate::bail!("flag was {}", flag);
        }
        Ok(1)
    }

    #[test]
    fn test_bail_macro() {
        assert_eq!(bails(false).unwrap(), 1);
        assert_eq!(bails(true).unwrap_err().to_string(), "flag was true");
    }
}
