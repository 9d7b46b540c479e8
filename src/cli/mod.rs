//! Command line interface for the npm bundler.
//!
//! This module wires argument parsing, project loading and the [`Bundler`]
//! together and reports progress to the terminal.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::loader::LoaderRegistry;
use crate::bundler::{Bundler, Settings, SettingsBuilder};
use crate::error::{CliError, Result};
use crate::metadata;
use path_absolutize::Absolutize;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args).await
}

/// Executes a bundling pass for parsed arguments.
pub async fn execute(args: &Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let config = RuntimeConfig::from(args);

    let settings = build_settings(args)?;
    config.section(&format!("Bundling {}", settings.project_dir().display()))?;
    config.verbose_println(&format!("Output: {}", settings.output_dir().display()))?;
    config.verbose_println(&format!(
        "Max parallel files: {}",
        settings.max_parallel_files()
    ))?;

    let project = metadata::load_project(&settings).await?;
    config.progress(&format!(
        "Loaded {} with {} dependency package(s)",
        project.root().id(),
        project.dependencies().len()
    ))?;

    let bundler = Bundler::new(settings, &LoaderRegistry::with_builtins())?;
    let summary = bundler.bundle_project(&project).await?;

    for package in &summary.packages {
        config.indent(&format!(
            "{} ({}): {} file(s) written, {} extra artifact(s)",
            package.id, package.status, package.files_written, package.artifacts_written
        ))?;
    }
    if bundler.settings().dump_report() {
        config.verbose_println(&format!(
            "Report: {}",
            bundler.settings().report_path().display()
        ))?;
    }
    config.success(&summary.to_string())?;

    Ok(0)
}

/// Builds settings from `.npmbundlerrc`, overridden by command line flags.
pub fn build_settings(args: &Args) -> Result<Settings> {
    let project_dir = args.project.absolutize()?.into_owned();
    let rc = metadata::load_npmbundlerrc(&project_dir)?;

    let mut builder = SettingsBuilder::new().project_dir(&project_dir).apply_rc(rc);
    if let Some(output) = &args.output {
        builder = builder.output_dir(output.absolutize()?);
    }
    if let Some(max) = args.max_parallel_files {
        builder = builder.max_parallel_files(max);
    }
    if args.dump_report {
        builder = builder.dump_report(true);
    }
    if args.no_manifest {
        builder = builder.use_manifest(false);
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_npmbundlerrc() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".npmbundlerrc"),
            r#"{ "sources": ["src"], "output": "dist", "max-parallel-files": 4 }"#,
        )
        .unwrap();
        let project = temp.path().to_string_lossy().to_string();

        let args = Args::try_parse_from(["kodegen_bundler_npm", "--project", &project]).unwrap();
        let settings = build_settings(&args).unwrap();
        assert_eq!(settings.output_dir(), temp.path().join("dist"));
        assert_eq!(settings.max_parallel_files(), 4);
        assert_eq!(settings.sources(), ["src"]);

        let args = Args::try_parse_from([
            "kodegen_bundler_npm",
            "--project",
            &project,
            "-j",
            "2",
            "--no-manifest",
        ])
        .unwrap();
        let settings = build_settings(&args).unwrap();
        assert_eq!(settings.max_parallel_files(), 2);
        assert!(!settings.use_manifest());
    }
}
