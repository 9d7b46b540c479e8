//! File system utilities for bundling.
//!
//! Provides async file operations with automatic directory creation and
//! path-annotated errors.

use crate::bundler::error::{ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Writes `contents` to `path`, creating any parent directories as needed.
///
/// Overwrites an existing file.
pub async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating output directory", parent)?;
    }
    fs::write(path, contents)
        .await
        .fs_context("writing output file", path)
}

/// Reads a source file as raw bytes.
pub async fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path)
        .await
        .fs_context("reading source file", path)
}

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Returns true if `path` exists and is a directory.
pub async fn is_dir(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}
