//! Persists the outcome of a file's loader chain.

use crate::bail;
use crate::bundler::loader::{BUNDLER_SOURCE_TAG, FileContext};
use crate::bundler::utils::{fs, path::to_slash};
use crate::bundler::{PackageDescriptor, Result, Settings};
use std::path::{Path, PathBuf};

/// Files written for one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Destination of the transformed content, if any was written.
    pub content_written: Option<PathBuf>,
    /// Destinations of the extra artifacts written.
    pub artifacts_written: Vec<PathBuf>,
}

impl WriteOutcome {
    /// Number of files written.
    pub fn files_written(&self) -> usize {
        self.artifacts_written.len() + usize::from(self.content_written.is_some())
    }
}

/// Computes where a project-relative path lands in the destination package.
///
/// The path is rebased from `src` onto `dest`. When `dest` is the root
/// package, the first configured source directory is stripped as well, so
/// `src/a/b.js` lands at `<dest>/a/b.js`.
///
/// # Errors
///
/// Fails if `project_relative` does not belong to `src`.
pub fn destination_path(
    settings: &Settings,
    src: &PackageDescriptor,
    dest: &PackageDescriptor,
    project_relative: &Path,
) -> Result<PathBuf> {
    let absolute = settings.resolve_path(project_relative);
    let package_relative = match absolute.strip_prefix(src.dir()) {
        Ok(relative) => relative,
        Err(_) => bail!(
            "{} does not belong to package {}",
            project_relative.display(),
            src.id()
        ),
    };

    let relative = if dest.is_root() {
        settings.strip_source_dir(package_relative)
    } else {
        package_relative.to_path_buf()
    };

    Ok(dest.dir().join(relative))
}

/// Writes the final content and extra artifacts of a file under `dest`.
///
/// Nothing is written for `None` content or for declined artifacts. Each
/// written artifact adds an informational entry to the file's log. Writes
/// are not transactional.
pub async fn write_result(
    settings: &Settings,
    src: &PackageDescriptor,
    dest: &PackageDescriptor,
    context: &mut FileContext,
) -> Result<WriteOutcome> {
    let mut outcome = WriteOutcome::default();

    if let Some(content) = &context.content {
        let target = destination_path(settings, src, dest, context.file_path())?;
        fs::write_file(&target, content).await?;
        log::debug!("Wrote {}", target.display());
        outcome.content_written = Some(target);
    }

    let artifacts: Vec<(PathBuf, String)> = context
        .emitted_artifacts()
        .map(|(artifact, content)| (artifact.to_path_buf(), content.to_string()))
        .collect();

    // One entry per artifact, appended right after its write.
    for (artifact, content) in artifacts {
        let target = destination_path(settings, src, dest, &artifact)?;
        fs::write_file(&target, &content).await?;
        context.log.info(
            BUNDLER_SOURCE_TAG,
            format!("Emitted extra artifact {}", to_slash(&artifact)),
        );
        outcome.artifacts_written.push(target);
    }

    Ok(outcome)
}
