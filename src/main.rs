//! Kodegen Bundler NPM - rule-driven bundler for npm projects.
//!
//! This binary runs the loader rules of a project's `.npmbundlerrc` over its
//! sources and installed dependencies, writing the results to the output
//! directory.

use kodegen_bundler_npm::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
