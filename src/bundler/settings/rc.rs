//! `.npmbundlerrc` file model.

use super::RuleSettings;
use serde::{Deserialize, Serialize};

/// Contents of a project's `.npmbundlerrc`.
///
/// Every key is optional; missing keys fall back to the defaults applied by
/// [`SettingsBuilder`](super::SettingsBuilder).
///
/// ```json
/// {
///   "sources": ["src"],
///   "output": "build",
///   "max-parallel-files": 64,
///   "rules": [{ "test": "\\.js$", "use": ["copy-loader"] }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct NpmbundlerRc {
    /// Project source directories
    pub sources: Vec<String>,

    /// Output directory, relative to the project
    pub output: Option<String>,

    /// Maximum files processed concurrently per package
    pub max_parallel_files: Option<usize>,

    /// Write a JSON report next to the output
    pub dump_report: bool,

    /// Track dependency digests to skip unchanged packages
    pub manifest: Option<bool>,

    /// Loader rules
    pub rules: Vec<RuleSettings>,
}
