//! Path normalization helpers.
//!
//! Rule expressions, glob patterns and report keys all operate on
//! `/`-separated relative paths regardless of the host platform.

use std::path::{Component, Path};

/// Renders a relative path with `/` separators.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalizes a configured directory: no leading `./`, no trailing `/`,
/// `/` separators. `.` becomes the empty string.
pub fn normalize_dir(dir: &str) -> String {
    to_slash(Path::new(&dir.replace('\\', "/")))
}
