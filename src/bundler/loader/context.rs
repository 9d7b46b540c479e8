//! Per-file state threaded through a loader chain.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Source tag used for diagnostics emitted by the bundler itself.
pub const BUNDLER_SOURCE_TAG: &str = "kodegen-bundler";

/// Severity of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Informational
    Info,
    /// Something looked wrong but processing continued
    Warn,
    /// Something failed
    Error,
}

/// A single diagnostic entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Severity
    pub level: LogLevel,
    /// Who emitted it (a loader name or [`BUNDLER_SOURCE_TAG`])
    pub source: String,
    /// Message text
    pub message: String,
}

/// Append-only diagnostic sink scoped to one file's run.
#[derive(Debug, Clone, Default)]
pub struct FileLog {
    entries: Vec<LogEntry>,
}

impl FileLog {
    /// Appends an informational entry.
    pub fn info(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.push(LogLevel::Info, source.into(), message.into());
    }

    /// Appends a warning entry.
    pub fn warn(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.push(LogLevel::Warn, source.into(), message.into());
    }

    /// Appends an error entry.
    pub fn error(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.push(LogLevel::Error, source.into(), message.into());
    }

    fn push(&mut self, level: LogLevel, source: String, message: String) {
        log::debug!("[{}] {:?}: {}", source, level, message);
        self.entries.push(LogEntry {
            level,
            source,
            message,
        });
    }

    /// Returns the recorded entries in order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the log, returning its entries.
    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

/// Mutable state of one file while its loader chain runs.
///
/// Created fresh for every file, lent to each loader in turn and handed to
/// the result writer once the chain completes.
#[derive(Debug)]
pub struct FileContext {
    /// Current content. `None` means the file produces no output.
    pub content: Option<String>,

    /// Diagnostics for this file.
    pub log: FileLog,

    /// Project-relative path of the file being processed.
    file_path: PathBuf,

    /// Project-relative path to extra content; `None` declines the artifact.
    extra_artifacts: BTreeMap<PathBuf, Option<String>>,
}

impl FileContext {
    /// Creates the context for a file about to enter its chain.
    pub fn new(file_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            log: FileLog::default(),
            file_path: file_path.into(),
            extra_artifacts: BTreeMap::new(),
        }
    }

    /// Returns the project-relative path of the file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Sets (or replaces) an extra artifact.
    ///
    /// `path` is project-relative. Passing `None` records that the artifact
    /// is declined; it will not be written.
    pub fn set_extra_artifact(&mut self, path: impl Into<PathBuf>, content: Option<String>) {
        self.extra_artifacts.insert(path.into(), content);
    }

    /// Returns every extra artifact entry, including declined ones.
    pub fn extra_artifacts(&self) -> &BTreeMap<PathBuf, Option<String>> {
        &self.extra_artifacts
    }

    /// Iterates over the artifacts that will be written.
    pub fn emitted_artifacts(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.extra_artifacts
            .iter()
            .filter_map(|(path, content)| content.as_deref().map(|c| (path.as_path(), c)))
    }
}
