//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation and
//! the runtime configuration derived from the parsed arguments.

use clap::Parser;
use std::path::PathBuf;

/// Rule-driven npm package bundler
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_npm",
    version,
    about = "Rule-driven npm package bundler",
    long_about = "Runs the loader rules configured in .npmbundlerrc over a project's sources and
its installed production dependencies, writing the results to the output directory.

Usage:
  kodegen_bundler_npm
  kodegen_bundler_npm --project ./my-portlet --output ./my-portlet/build
  kodegen_bundler_npm --max-parallel-files 16 --dump-report

Exit code 0 = every file of every dirty package was processed."
)]
pub struct Args {
    /// Project directory (where package.json lives)
    #[arg(short, long, value_name = "DIR", default_value = ".", env = "KODEGEN_BUNDLER_PROJECT")]
    pub project: PathBuf,

    /// Output directory (overrides "output" in .npmbundlerrc)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Maximum files processed concurrently per package
    #[arg(short = 'j', long, value_name = "N")]
    pub max_parallel_files: Option<usize>,

    /// Write a JSON report to the output directory
    #[arg(long)]
    pub dump_report: bool,

    /// Rebuild every dependency, ignoring the build manifest
    #[arg(long)]
    pub no_manifest: bool,

    /// Print detailed progress
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print errors only
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.max_parallel_files == Some(0) {
            return Err("max-parallel-files must be at least 1".to_string());
        }

        if !self.project.is_dir() {
            return Err(format!(
                "Project directory does not exist: {}",
                self.project.display()
            ));
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
