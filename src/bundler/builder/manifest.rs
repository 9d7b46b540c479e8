//! Build manifest used to skip unchanged dependencies.
//!
//! The manifest lives at `<output>/manifest.json` and records, per
//! dependency package id, the digest of the package's source tree and of the
//! loader rules at the time it was last bundled.

use crate::bundler::Result;
use crate::bundler::error::ErrorExt;
use crate::bundler::utils::fs;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Manifest entry of one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// SHA256 of the package source tree
    pub digest: String,
    /// SHA256 of the loader rules the package was bundled with
    #[serde(default)]
    pub rules_digest: String,
    /// When the package was bundled
    pub built_at: DateTime<Utc>,
}

/// Digests of the dependencies bundled by previous runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    #[serde(default)]
    packages: BTreeMap<String, ManifestEntry>,
}

impl BuildManifest {
    /// Loads the manifest at `path`.
    ///
    /// A missing or unreadable manifest yields an empty one, so every
    /// dependency is rebuilt.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).fs_context("reading build manifest", path),
        };

        match serde_json::from_str(&text) {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                log::warn!(
                    "Ignoring corrupt build manifest {}: {}",
                    path.display(),
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Writes the manifest to `path` as pretty JSON.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write_file(path, &json).await
    }

    /// Returns true if `id` was last bundled from a tree with `digest`
    /// under rules with `rules_digest`.
    pub fn is_fresh(&self, id: &str, digest: &str, rules_digest: &str) -> bool {
        self.packages
            .get(id)
            .is_some_and(|entry| entry.digest == digest && entry.rules_digest == rules_digest)
    }

    /// Records that `id` was bundled from a tree with `digest` under rules
    /// with `rules_digest` just now.
    pub fn record(
        &mut self,
        id: impl Into<String>,
        digest: impl Into<String>,
        rules_digest: impl Into<String>,
    ) {
        self.packages.insert(
            id.into(),
            ManifestEntry {
                digest: digest.into(),
                rules_digest: rules_digest.into(),
                built_at: Utc::now(),
            },
        );
    }

    /// Drops entries whose id is not in `ids`.
    pub fn retain_ids<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let keep: std::collections::HashSet<&str> = ids.into_iter().collect();
        self.packages.retain(|id, _| keep.contains(id.as_str()));
    }

    /// Returns the entry recorded for `id`.
    pub fn entry(&self, id: &str) -> Option<&ManifestEntry> {
        self.packages.get(id)
    }

    /// Number of recorded packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_manifest_is_empty() {
        let temp = TempDir::new().unwrap();
        let manifest = BuildManifest::load(&temp.path().join("manifest.json"))
            .await
            .unwrap();
        assert!(manifest.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_manifest_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(BuildManifest::load(&path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("build/manifest.json");

        let mut manifest = BuildManifest::default();
        manifest.record("dep@1.0.0", "abc", "r1");
        manifest.save(&path).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"builtAt\""));
        assert!(text.contains("\"rulesDigest\""));

        let loaded = BuildManifest::load(&path).await.unwrap();
        assert_eq!(loaded, manifest);
        assert!(loaded.is_fresh("dep@1.0.0", "abc", "r1"));
        assert!(!loaded.is_fresh("dep@1.0.0", "def", "r1"));
        assert!(!loaded.is_fresh("dep@1.0.0", "abc", "r2"));
        assert!(!loaded.is_fresh("other@1.0.0", "abc", "r1"));
    }

    #[tokio::test]
    async fn test_entry_without_rules_digest_is_outdated() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");
        std::fs::write(
            &path,
            r#"{ "packages": { "dep@1.0.0": { "digest": "abc", "builtAt": "2024-01-01T00:00:00Z" } } }"#,
        )
        .unwrap();

        let manifest = BuildManifest::load(&path).await.unwrap();
        assert_eq!(manifest.len(), 1);
        assert!(!manifest.is_fresh("dep@1.0.0", "abc", "r1"));
    }

    #[test]
    fn test_retain_ids() {
        let mut manifest = BuildManifest::default();
        manifest.record("a@1.0.0", "1", "r");
        manifest.record("b@1.0.0", "2", "r");

        manifest.retain_ids(["b@1.0.0"]);

        assert_eq!(manifest.len(), 1);
        assert!(manifest.entry("b@1.0.0").is_some());
    }
}
