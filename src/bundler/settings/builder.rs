//! Builder for constructing Settings.

use super::{NpmbundlerRc, RuleSettings, Settings};
use crate::bundler::utils::path::normalize_dir;
use std::path::{Path, PathBuf};

/// Default number of files processed concurrently per package.
pub const DEFAULT_MAX_PARALLEL_FILES: usize = 128;

/// Default output directory, relative to the project.
pub const DEFAULT_OUTPUT_DIR: &str = "build";

/// Builder for constructing [`Settings`].
///
/// Provides a fluent API for building bundler settings with validation.
/// Values from a project's `.npmbundlerrc` are applied with
/// [`SettingsBuilder::apply_rc`]; later calls override them.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_npm::bundler::{NpmbundlerRc, SettingsBuilder};
///
/// # fn example(rc: NpmbundlerRc) -> kodegen_bundler_npm::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_dir("/work/my-portlet")
///     .apply_rc(rc)
///     .max_parallel_files(8)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    project_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    sources: Vec<String>,
    max_parallel_files: Option<usize>,
    rules: Vec<RuleSettings>,
    dump_report: bool,
    use_manifest: Option<bool>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project root directory.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn project_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory.
    ///
    /// Relative paths are resolved against the project root.
    ///
    /// Default: `build`
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the project source directories.
    ///
    /// Default: Empty (the root package contributes no files)
    pub fn sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    /// Sets the maximum number of files processed concurrently per package.
    ///
    /// Values below 1 are treated as 1.
    ///
    /// Default: 128
    pub fn max_parallel_files(mut self, max: usize) -> Self {
        self.max_parallel_files = Some(max);
        self
    }

    /// Sets the loader rules.
    pub fn rules(mut self, rules: Vec<RuleSettings>) -> Self {
        self.rules = rules;
        self
    }

    /// Enables writing the JSON report.
    pub fn dump_report(mut self, dump: bool) -> Self {
        self.dump_report = dump;
        self
    }

    /// Enables or disables the build manifest.
    ///
    /// Default: enabled
    pub fn use_manifest(mut self, enabled: bool) -> Self {
        self.use_manifest = Some(enabled);
        self
    }

    /// Applies the values present in an `.npmbundlerrc`.
    pub fn apply_rc(mut self, rc: NpmbundlerRc) -> Self {
        self.sources = rc.sources;
        self.rules = rc.rules;
        self.dump_report = rc.dump_report;
        if let Some(output) = rc.output {
            self.output_dir = Some(PathBuf::from(output));
        }
        if let Some(max) = rc.max_parallel_files {
            self.max_parallel_files = Some(max);
        }
        if let Some(manifest) = rc.manifest {
            self.use_manifest = Some(manifest);
        }
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `project_dir` is missing, or if the output
    /// directory would coincide with the project directory.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let project_dir = self.project_dir.context("project_dir is required")?;

        let output_dir = match self.output_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => project_dir.join(dir),
            None => project_dir.join(DEFAULT_OUTPUT_DIR),
        };

        if output_dir == project_dir {
            return Err(crate::bundler::Error::Config(format!(
                "output directory must differ from the project directory ({})",
                project_dir.display()
            )));
        }

        let sources = self.sources.iter().map(|s| normalize_dir(s)).collect();

        Ok(Settings::new(
            project_dir,
            output_dir,
            sources,
            self.max_parallel_files
                .unwrap_or(DEFAULT_MAX_PARALLEL_FILES)
                .max(1),
            self.rules,
            self.dump_report,
            self.use_manifest.unwrap_or(true),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_project_dir() {
        let err = SettingsBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("project_dir is required"));
    }

    #[test]
    fn test_defaults() {
        let settings = SettingsBuilder::new().project_dir("/project").build().unwrap();

        assert_eq!(settings.output_dir(), Path::new("/project/build"));
        assert_eq!(settings.max_parallel_files(), DEFAULT_MAX_PARALLEL_FILES);
        assert!(settings.sources().is_empty());
        assert!(settings.use_manifest());
        assert!(!settings.dump_report());
    }

    #[test]
    fn test_max_parallel_files_clamped() {
        let settings = SettingsBuilder::new()
            .project_dir("/project")
            .max_parallel_files(0)
            .build()
            .unwrap();
        assert_eq!(settings.max_parallel_files(), 1);
    }

    #[test]
    fn test_output_same_as_project_rejected() {
        let err = SettingsBuilder::new()
            .project_dir("/project")
            .output_dir("/project")
            .build()
            .unwrap_err();
        assert!(matches!(err, crate::bundler::Error::Config(_)));
    }

    #[test]
    fn test_apply_rc_then_override() {
        let rc: NpmbundlerRc = serde_json::from_str(
            r#"{ "sources": ["./src/"], "output": "dist", "max-parallel-files": 4, "manifest": false }"#,
        )
        .unwrap();

        let settings = SettingsBuilder::new()
            .project_dir("/project")
            .apply_rc(rc)
            .max_parallel_files(2)
            .build()
            .unwrap();

        assert_eq!(settings.sources(), &["src".to_string()]);
        assert_eq!(settings.output_dir(), Path::new("/project/dist"));
        assert_eq!(settings.max_parallel_files(), 2);
        assert!(!settings.use_manifest());
    }
}
