//! Command line behavior of the bundler binary.

// assert_cmd::Command::cargo_bin is deprecated in recent releases but still works
#![allow(deprecated)]

mod common;

use assert_cmd::Command;
use common::{copy_fixture, read};
use predicates::prelude::*;

fn bundler() -> Command {
    let mut cmd = Command::cargo_bin("kodegen_bundler_npm").unwrap();
    cmd.env_remove("KODEGEN_BUNDLER_PROJECT");
    cmd
}

#[test]
fn test_bundles_fixture_project() {
    let temp = copy_fixture();

    bundler()
        .arg("--project")
        .arg(temp.path())
        .arg("--dump-report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bundled 4 package(s)"));

    let out = temp.path().join("build");
    assert_eq!(read(&out, "index.js"), "hello\n");
    assert!(out.join("kodegen-bundler-report.json").exists());
    assert!(out.join("manifest.json").exists());
}

#[test]
fn test_custom_output_and_quiet() {
    let temp = copy_fixture();
    let output = tempfile::TempDir::new().unwrap();

    bundler()
        .arg("--project")
        .arg(temp.path())
        .arg("--output")
        .arg(output.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(output.path().join("components/button.js").exists());
    assert!(!temp.path().join("build").exists());
}

#[test]
fn test_zero_parallelism_is_rejected() {
    let temp = copy_fixture();

    bundler()
        .arg("--project")
        .arg(temp.path())
        .args(["--max-parallel-files", "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("max-parallel-files must be at least 1"));
}

#[test]
fn test_missing_package_json_fails() {
    let temp = tempfile::TempDir::new().unwrap();

    bundler()
        .arg("--project")
        .arg(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("package.json"));
}

#[test]
fn test_invalid_npmbundlerrc_fails_with_hint() {
    let temp = copy_fixture();
    std::fs::write(temp.path().join(".npmbundlerrc"), "{ \"rules\": 3 }").unwrap();

    bundler()
        .arg("--project")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse_npmbundlerrc"));
}
