//! Package checksum calculation.
//!
//! Provides SHA256 digests of package source trees and of the loader rules,
//! used to detect dependencies that have not changed since the previous
//! build.

use super::discovery::NODE_MODULES;
use crate::bundler::RuleSettings;
use crate::{bail, bundler::Result, bundler::error::ErrorExt};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Calculates the SHA256 digest of a package directory.
///
/// Recursively hashes every file's relative path and content in sorted order
/// so the result is deterministic. Nested `node_modules` trees are not part
/// of the package and are skipped.
///
/// # Algorithm
///
/// 1. Collect all files with walkdir on the blocking pool
/// 2. Sort paths lexicographically
/// 3. For each file: hash(relative_path + file_content)
/// 4. Return the combined hex digest
///
/// # Errors
///
/// Fails if `dir` is not a directory or a file cannot be read.
pub async fn calculate_package_sha256(dir: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(dir)
        .await
        .fs_context("reading package metadata", dir)?;
    if !metadata.is_dir() {
        bail!("Package path is not a directory: {}", dir.display());
    }

    let root = dir.to_path_buf();
    let mut files = tokio::task::spawn_blocking(move || collect_files(&root)).await??;
    files.sort();

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    for path in files {
        if let Ok(rel_path) = path.strip_prefix(dir) {
            hasher.update(rel_path.to_string_lossy().as_bytes());
        }

        let mut file = tokio::fs::File::open(&path)
            .await
            .fs_context("opening file for hashing", &path)?;

        loop {
            let n = file
                .read(&mut buffer)
                .await
                .fs_context("reading file for hash calculation", &path)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Calculates the SHA256 digest of the loader rules.
///
/// Rules serialize deterministically, so equal rule sets (including loader
/// options) always produce the same digest.
pub fn calculate_rules_sha256(rules: &[RuleSettings]) -> Result<String> {
    let json = serde_json::to_vec(rules)?;
    Ok(format!("{:x}", Sha256::digest(&json)))
}

fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !(e.depth() > 0 && e.file_type().is_dir() && e.file_name() == NODE_MODULES))
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
