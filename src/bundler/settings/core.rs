//! Core Settings struct and implementations.

use super::{PackageDescriptor, RuleSettings};
use crate::bundler::utils::path::to_slash;
use std::path::{Path, PathBuf};

/// File name of the build manifest inside the output directory.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// File name of the JSON report inside the output directory.
pub const REPORT_FILE_NAME: &str = "kodegen-bundler-report.json";

/// Main settings for bundler operations.
///
/// Central configuration for a bundling pass, constructed via
/// [`SettingsBuilder`](super::SettingsBuilder). Passed explicitly to file
/// discovery, the loader chain resolver and the result writer.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_npm::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_npm::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_dir("/work/my-portlet")
///     .sources(vec!["src".into()])
///     .max_parallel_files(32)
///     .build()?;
///
/// assert_eq!(settings.output_dir(), std::path::Path::new("/work/my-portlet/build"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Absolute project root (where `package.json` lives).
    project_dir: PathBuf,

    /// Absolute output directory.
    output_dir: PathBuf,

    /// Normalized source directories, relative to the project root.
    sources: Vec<String>,

    /// Maximum number of files processed concurrently per package.
    max_parallel_files: usize,

    /// Loader rules.
    rules: Vec<RuleSettings>,

    /// Whether to write a JSON report after a successful build.
    dump_report: bool,

    /// Whether to use the build manifest for clean detection.
    use_manifest: bool,
}

impl Settings {
    /// Returns the project root.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the source directories.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Returns the maximum number of concurrently processed files.
    pub fn max_parallel_files(&self) -> usize {
        self.max_parallel_files
    }

    /// Returns the loader rules.
    pub fn rules(&self) -> &[RuleSettings] {
        &self.rules
    }

    /// Whether a JSON report is written.
    pub fn dump_report(&self) -> bool {
        self.dump_report
    }

    /// Whether the build manifest is used.
    pub fn use_manifest(&self) -> bool {
        self.use_manifest
    }

    /// Returns the path of the build manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILE_NAME)
    }

    /// Returns the path of the JSON report.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE_NAME)
    }

    /// Resolve a path relative to the project root.
    ///
    /// If the path is absolute, returns it unchanged.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    /// Glob patterns selecting a package's files, relative to the package.
    ///
    /// The root package is scoped to the configured source directories and
    /// never sees its own output; dependencies are processed whole.
    pub fn package_globs(&self, package: &PackageDescriptor) -> Vec<String> {
        if !package.is_root() {
            return vec!["**/*".to_string()];
        }

        let mut globs: Vec<String> = self
            .sources
            .iter()
            .map(|source| {
                if source.is_empty() {
                    "**/*".to_string()
                } else {
                    format!("{}/**/*", source)
                }
            })
            .collect();

        if let Ok(output) = self.output_dir.strip_prefix(&self.project_dir) {
            globs.push(format!("!{}/**/*", to_slash(output)));
        }

        globs
    }

    /// Strips the first matching source directory from a root-relative path.
    ///
    /// `src/a/b.js` becomes `a/b.js` when `src` is a source directory; paths
    /// outside every source directory are returned unchanged.
    pub fn strip_source_dir(&self, relative: &Path) -> PathBuf {
        self.sources
            .iter()
            .filter(|source| !source.is_empty())
            .find_map(|source| relative.strip_prefix(source).ok())
            .unwrap_or(relative)
            .to_path_buf()
    }

    /// Returns the output directory of a package.
    ///
    /// The root package lands directly in the output directory; dependencies
    /// land in `node_modules/<name>@<version>` below it.
    pub fn package_output_dir(&self, package: &PackageDescriptor) -> PathBuf {
        if package.is_root() {
            self.output_dir.clone()
        } else {
            self.output_dir.join("node_modules").join(package.id())
        }
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        project_dir: PathBuf,
        output_dir: PathBuf,
        sources: Vec<String>,
        max_parallel_files: usize,
        rules: Vec<RuleSettings>,
        dump_report: bool,
        use_manifest: bool,
    ) -> Self {
        Self {
            project_dir,
            output_dir,
            sources,
            max_parallel_files,
            rules,
            dump_report,
            use_manifest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::SettingsBuilder;
    use super::*;

    fn settings(sources: &[&str]) -> Settings {
        SettingsBuilder::new()
            .project_dir("/project")
            .sources(sources.iter().map(|s| s.to_string()).collect())
            .build()
            .unwrap()
    }

    #[test]
    fn test_strip_source_dir() {
        let settings = settings(&["src"]);
        assert_eq!(settings.strip_source_dir(Path::new("src/a/b.js")), PathBuf::from("a/b.js"));
        assert_eq!(settings.strip_source_dir(Path::new("lib/x.js")), PathBuf::from("lib/x.js"));
        assert_eq!(
            settings.strip_source_dir(Path::new("srcfoo/x.js")),
            PathBuf::from("srcfoo/x.js")
        );
    }

    #[test]
    fn test_strip_first_matching_source() {
        let settings = settings(&["src/main", "src"]);
        assert_eq!(settings.strip_source_dir(Path::new("src/main/a.js")), PathBuf::from("a.js"));
        assert_eq!(settings.strip_source_dir(Path::new("src/b.js")), PathBuf::from("b.js"));
    }

    #[test]
    fn test_package_globs() {
        let settings = settings(&["./src/", "assets"]);
        let root = PackageDescriptor::root("app", "1.0.0", "/project");
        let dep = PackageDescriptor::dependency("dep", "1.0.0", "/project/node_modules/dep");

        assert_eq!(
            settings.package_globs(&root),
            vec!["src/**/*", "assets/**/*", "!build/**/*"]
        );
        assert_eq!(settings.package_globs(&dep), vec!["**/*"]);
    }

    #[test]
    fn test_package_output_dir() {
        let settings = settings(&["src"]);
        let root = PackageDescriptor::root("app", "1.0.0", "/project");
        let dep = PackageDescriptor::dependency("dep", "2.0.0", "/project/node_modules/dep");

        assert_eq!(settings.package_output_dir(&root), PathBuf::from("/project/build"));
        assert_eq!(
            settings.package_output_dir(&dep),
            PathBuf::from("/project/build/node_modules/dep@2.0.0")
        );
    }

    #[test]
    fn test_resolve_path() {
        let settings = settings(&[]);
        assert_eq!(settings.resolve_path(Path::new("/other")), PathBuf::from("/other"));
        assert_eq!(settings.resolve_path(Path::new("dist")), PathBuf::from("/project/dist"));
    }
}
