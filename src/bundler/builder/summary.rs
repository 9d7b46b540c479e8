//! Build summary types.

use super::writer::WriteOutcome;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Outcome of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// No loader applied; the file was not read or written.
    Untouched,
    /// The loader chain ran and its results were written.
    Processed(WriteOutcome),
}

/// Whether a package was processed in this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    /// Files were discovered and run through their loader chains
    Processed,
    /// The package was clean
    Skipped,
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageStatus::Processed => write!(f, "processed"),
            PackageStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Result of bundling one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSummary {
    /// Package id (`name@version`)
    pub id: String,
    /// Processed or skipped
    pub status: PackageStatus,
    /// Files discovered and attempted
    pub files_attempted: usize,
    /// Files that had a non-empty loader chain
    pub files_transformed: usize,
    /// Primary outputs written
    pub files_written: usize,
    /// Extra artifacts written
    pub artifacts_written: usize,
    /// Time spent on the package
    pub duration: Duration,
}

impl PackageSummary {
    /// Summary of a clean package.
    pub fn skipped(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: PackageStatus::Skipped,
            files_attempted: 0,
            files_transformed: 0,
            files_written: 0,
            artifacts_written: 0,
            duration: Duration::ZERO,
        }
    }

    /// Summary of a processed package built from its file outcomes.
    pub fn processed(id: impl Into<String>, outcomes: &[FileOutcome], duration: Duration) -> Self {
        let mut summary = Self {
            status: PackageStatus::Processed,
            files_attempted: outcomes.len(),
            duration,
            ..Self::skipped(id)
        };

        for outcome in outcomes {
            if let FileOutcome::Processed(written) = outcome {
                summary.files_transformed += 1;
                summary.files_written += usize::from(written.content_written.is_some());
                summary.artifacts_written += written.artifacts_written.len();
            }
        }

        summary
    }
}

/// Result of a complete bundling run.
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    /// One entry per package, root first, then dependencies by id
    pub packages: Vec<PackageSummary>,
    /// Wall-clock duration of the run
    pub total_duration: Duration,
}

impl BuildSummary {
    /// Number of packages processed.
    pub fn processed_count(&self) -> usize {
        self.count(PackageStatus::Processed)
    }

    /// Number of clean packages skipped.
    pub fn skipped_count(&self) -> usize {
        self.count(PackageStatus::Skipped)
    }

    fn count(&self, status: PackageStatus) -> usize {
        self.packages.iter().filter(|p| p.status == status).count()
    }

    /// Total files attempted across packages.
    pub fn files_attempted(&self) -> usize {
        self.packages.iter().map(|p| p.files_attempted).sum()
    }

    /// Total primary outputs written.
    pub fn files_written(&self) -> usize {
        self.packages.iter().map(|p| p.files_written).sum()
    }

    /// Total extra artifacts written.
    pub fn artifacts_written(&self) -> usize {
        self.packages.iter().map(|p| p.artifacts_written).sum()
    }

    /// Looks a package up by id.
    pub fn package(&self, id: &str) -> Option<&PackageSummary> {
        self.packages.iter().find(|p| p.id == id)
    }
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bundled {} package(s), {} skipped: {} file(s) written, {} extra artifact(s) from {} file(s) in {:.2?}",
            self.processed_count(),
            self.skipped_count(),
            self.files_written(),
            self.artifacts_written(),
            self.files_attempted(),
            self.total_duration
        )
    }
}
