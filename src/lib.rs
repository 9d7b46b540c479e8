//! Rule-driven bundler library for npm projects
//!
//! This library provides the rule-execution engine that:
//! - discovers the files of a project and of its installed dependencies
//! - runs each file through the loader chain configured for it
//! - writes transformed content and extra artifacts to a parallel output tree
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
