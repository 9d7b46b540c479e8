//! Source file discovery for a package.
//!
//! Resolves glob patterns scoped to a package into a sorted list of
//! project-relative file paths.

use crate::bail;
use crate::bundler::utils::path::to_slash;
use crate::bundler::{Error, PackageDescriptor, Result, Settings};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Name of the directory holding installed dependencies.
pub const NODE_MODULES: &str = "node_modules";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled positive and negative (`!`-prefixed) patterns.
struct PatternSet {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PatternSet {
    fn compile(patterns: &[String]) -> Result<Self> {
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        for pattern in patterns {
            let (target, text) = match pattern.strip_prefix('!') {
                Some(negated) => (&mut exclude, negated),
                None => (&mut include, pattern.as_str()),
            };
            let compiled = Pattern::new(text).map_err(|error| Error::Pattern {
                pattern: pattern.clone(),
                error,
            })?;
            target.push(compiled);
        }

        Ok(Self { include, exclude })
    }

    fn matches(&self, path: &str) -> bool {
        self.include
            .iter()
            .any(|p| p.matches_with(path, MATCH_OPTIONS))
            && !self
                .exclude
                .iter()
                .any(|p| p.matches_with(path, MATCH_OPTIONS))
    }
}

fn is_nested_node_modules(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == NODE_MODULES
}

/// Discovers the files of a package matching `patterns`.
///
/// `package_dir` is relative to `project_dir`; patterns are matched against
/// paths relative to the package with `/` separators. Nested `node_modules`
/// trees are never entered. The returned paths are project-relative and
/// sorted.
///
/// # Errors
///
/// Fails on an invalid pattern or if the package directory cannot be walked.
pub fn discover_files(
    project_dir: &Path,
    package_dir: &Path,
    patterns: &[String],
) -> Result<Vec<PathBuf>> {
    let patterns = PatternSet::compile(patterns)?;
    let root = project_dir.join(package_dir);

    let mut files = Vec::new();
    for entry in WalkDir::new(&root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_nested_node_modules(e))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(&root) {
            Ok(relative) => relative,
            Err(_) => continue,
        };

        if patterns.matches(&to_slash(relative)) {
            files.push(package_dir.join(relative));
        }
    }

    files.sort();
    Ok(files)
}

/// Discovers the files of `package` using the globs configured for it.
///
/// The root package is scoped to the configured source directories;
/// dependencies are discovered whole. The walk runs on the blocking pool.
///
/// # Errors
///
/// Fails if the package lives outside the project directory or if
/// [`discover_files`] fails.
pub async fn discover_package_files(
    settings: &Settings,
    package: &PackageDescriptor,
) -> Result<Vec<PathBuf>> {
    let project_dir = settings.project_dir().to_path_buf();
    let package_dir = match package.dir().strip_prefix(&project_dir) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => bail!(
            "package {} at {} is outside the project directory {}",
            package.id(),
            package.dir().display(),
            project_dir.display()
        ),
    };
    let patterns = settings.package_globs(package);

    let files = tokio::task::spawn_blocking(move || {
        discover_files(&project_dir, &package_dir, &patterns)
    })
    .await??;

    log::debug!("Discovered {} file(s) in {}", files.len(), package.id());
    Ok(files)
}
