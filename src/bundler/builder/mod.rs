//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that drives every
//! dirty package of a project through discovery, its loader chains and the
//! result writer.
//!
//! # Overview
//!
//! For each package, the bundler:
//! 1. Skips it if it is clean
//! 2. Clones its descriptor into the output directory
//! 3. Discovers its files
//! 4. Runs each file's loader chain in bounded, chunked parallelism
//! 5. Writes the final content and extra artifacts
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 digests of package source trees
//! - [`discovery`] - glob-based file discovery
//! - [`manifest`] - digests of previously bundled dependencies
//! - [`orchestrator`] - main [`Bundler`] struct
//! - [`report`] - aggregated per-file diagnostics
//! - [`runner`] - bounded parallel runner
//! - [`summary`] - build summary types
//! - [`writer`] - result writer

pub mod checksum;
pub mod discovery;
pub mod manifest;
pub mod orchestrator;
pub mod report;
pub mod runner;
pub mod summary;
pub mod writer;

pub use manifest::{BuildManifest, ManifestEntry};
pub use orchestrator::{Bundler, dependency_digests};
pub use report::Report;
pub use summary::{BuildSummary, FileOutcome, PackageStatus, PackageSummary};
pub use writer::WriteOutcome;
