//! Aggregated diagnostics of a bundling run.

use super::summary::PackageStatus;
use crate::bundler::Result;
use crate::bundler::loader::LogEntry;
use crate::bundler::utils::{fs, path::to_slash};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default, Clone, Serialize)]
struct ReportData {
    packages: BTreeMap<String, PackageStatus>,
    files: BTreeMap<String, Vec<LogEntry>>,
}

/// Collects package outcomes and per-file diagnostics.
///
/// Shared by every in-flight file operation; entries are keyed by
/// project-relative path so the serialized report is deterministic.
#[derive(Debug, Default)]
pub struct Report {
    data: Mutex<ReportData>,
}

impl Report {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ReportData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records the status of a package.
    pub fn package(&self, id: &str, status: PackageStatus) {
        self.lock().packages.insert(id.to_string(), status);
    }

    /// Appends diagnostics of a file. Empty logs are not recorded.
    pub fn file(&self, project_relative: &Path, entries: Vec<LogEntry>) {
        if entries.is_empty() {
            return;
        }
        self.lock()
            .files
            .entry(to_slash(project_relative))
            .or_default()
            .extend(entries);
    }

    /// Returns the diagnostics recorded for a file.
    pub fn file_entries(&self, project_relative: &Path) -> Vec<LogEntry> {
        self.lock()
            .files
            .get(&to_slash(project_relative))
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the status recorded for a package.
    pub fn package_status(&self, id: &str) -> Option<PackageStatus> {
        self.lock().packages.get(id).copied()
    }

    /// Serializes the report to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        let data = self.lock().clone();
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Writes the report to `path`.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write_file(path, &json).await?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::loader::{BUNDLER_SOURCE_TAG, FileLog};

    fn entries(message: &str) -> Vec<LogEntry> {
        let mut log = FileLog::default();
        log.info(BUNDLER_SOURCE_TAG, message);
        log.into_entries()
    }

    #[test]
    fn test_records_files_and_packages() {
        let report = Report::new();
        report.package("app@1.0.0", PackageStatus::Processed);
        report.package("dep@1.0.0", PackageStatus::Skipped);
        report.file(Path::new("src/a.js"), entries("one"));
        report.file(Path::new("src/a.js"), entries("two"));
        report.file(Path::new("src/b.js"), Vec::new());

        assert_eq!(report.file_entries(Path::new("src/a.js")).len(), 2);
        assert!(report.file_entries(Path::new("src/b.js")).is_empty());
        assert_eq!(report.package_status("dep@1.0.0"), Some(PackageStatus::Skipped));
    }

    #[tokio::test]
    async fn test_save_writes_json() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("build/report.json");

        let report = Report::new();
        report.package("app@1.0.0", PackageStatus::Processed);
        report.file(Path::new("src/a.js"), entries("Emitted extra artifact src/a.css"));
        report.save(&path).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["packages"]["app@1.0.0"], "processed");
        assert_eq!(value["files"]["src/a.js"][0]["level"], "info");
        assert_eq!(value["files"]["src/a.js"][0]["source"], BUNDLER_SOURCE_TAG);
    }
}
