//! Loader subsystem.
//!
//! A loader is a transform step applied to a file's content. For every file
//! the bundler resolves an ordered chain of loaders
//! ([`LoaderChainResolver`]), runs it over a fresh [`FileContext`]
//! ([`run_loaders`]) and hands the final context to the result writer.
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_npm::bundler::loader::{
//!     FileContext, FnLoader, LoaderDescriptor, run_loaders,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> kodegen_bundler_npm::bundler::Result<()> {
//! let uppercase = LoaderDescriptor::new(
//!     "uppercase",
//!     Arc::new(FnLoader::new(|ctx, _| Ok(ctx.content.as_ref().map(|c| c.to_uppercase())))),
//!     serde_json::Value::Null,
//! );
//!
//! let ctx = run_loaders(&[uppercase], FileContext::new("src/index.js", "hello")).await?;
//! assert_eq!(ctx.content.as_deref(), Some("HELLO"));
//! # Ok(())
//! # }
//! ```

mod builtin;
mod context;
mod descriptor;
mod pipeline;
mod registry;
mod resolver;

pub use builtin::{COPY_LOADER, CopyLoader, IGNORE_LOADER, IgnoreLoader};
pub use context::{BUNDLER_SOURCE_TAG, FileContext, FileLog, LogEntry, LogLevel};
pub use descriptor::{FnLoader, Loader, LoaderDescriptor, LoaderFuture};
pub use pipeline::run_loaders;
pub use registry::LoaderRegistry;
pub use resolver::{LoaderChainResolver, RulesResolver};
