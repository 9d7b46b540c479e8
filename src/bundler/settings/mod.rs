//! Configuration structures for bundling operations.
//!
//! This module provides the configuration types for a bundling pass:
//! project paths and limits ([`Settings`]), package identity
//! ([`PackageDescriptor`]), loader rules ([`RuleSettings`]) and the
//! `.npmbundlerrc` file model ([`NpmbundlerRc`]), plus the builder used to
//! assemble them.

mod builder;
mod core;
mod package;
mod rc;
mod rules;

// Re-export all public types
pub use builder::{DEFAULT_MAX_PARALLEL_FILES, DEFAULT_OUTPUT_DIR, SettingsBuilder};
pub use self::core::{MANIFEST_FILE_NAME, REPORT_FILE_NAME, Settings};
pub use package::{PackageDescriptor, Project};
pub use rc::NpmbundlerRc;
pub use rules::{LoaderUse, Patterns, RuleSettings};
