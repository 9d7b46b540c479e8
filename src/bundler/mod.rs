//! Rule-execution engine for npm packages.
//!
//! Given the project's own package and its dependency packages, the
//! [`Bundler`] discovers each dirty package's files, runs every file through
//! the loader chain configured for it and writes the results into a parallel
//! destination tree under the output directory.
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_npm::bundler::{Bundler, PackageDescriptor, SettingsBuilder};
//! use kodegen_bundler_npm::bundler::loader::LoaderRegistry;
//!
//! # async fn example() -> kodegen_bundler_npm::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .project_dir("/work/my-portlet")
//!     .sources(vec!["src".into()])
//!     .build()?;
//!
//! let root = PackageDescriptor::root("my-portlet", "1.0.0", "/work/my-portlet");
//! let bundler = Bundler::new(settings, &LoaderRegistry::with_builtins())?;
//! let summary = bundler.bundle(&root, &[]).await?;
//!
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`builder`] - discovery, runner, writer and the [`Bundler`] orchestrator
//! - [`loader`] - loader trait, pipeline, registry and chain resolution
//! - [`settings`] - [`Settings`], [`SettingsBuilder`] and `.npmbundlerrc`
//! - [`error`] - engine error type and context helpers
//! - [`utils`] - filesystem and path helpers

pub mod builder;
pub mod error;
pub mod loader;
pub mod settings;
pub mod utils;

pub use builder::{BuildManifest, BuildSummary, Bundler, FileOutcome, PackageSummary, Report};
pub use error::{Error, Result};
pub use settings::{
    LoaderUse, NpmbundlerRc, PackageDescriptor, Patterns, Project, RuleSettings, Settings,
    SettingsBuilder,
};
