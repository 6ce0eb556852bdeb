//! End-to-end tests for the polydep CLI
//!
//! These tests verify:
//! - Text output for resolved and unresolved packages
//! - JSON output schema
//! - Exit codes for resolved, unresolved and failed runs
//! - Flag handling (ecosystem filters, config file, conflicting options)

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn polydep() -> Command {
    let mut cmd = Command::cargo_bin("polydep").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Create a test directory with a consistent multi-ecosystem project
fn create_resolvable_project() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    fs::write(
        temp_dir.path().join("package.json"),
        r#"{
  "name": "test-project",
  "dependencies": {
    "lodash": "4.17.21"
  },
  "devDependencies": {
    "typescript": "5.0.4"
  }
}"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("requirements.txt"),
        "requests==2.31.0\nflask>=2.0\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("Cargo.toml"),
        r#"[package]
name = "test-project"
version = "0.1.0"

[dependencies]
serde = "=1.0.190"
"#,
    )
    .unwrap();

    temp_dir
}

/// Create a test directory where requests is pinned twice
fn create_conflicting_project() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    fs::write(temp_dir.path().join("requirements.txt"), "requests==2.28.0\n").unwrap();
    fs::write(
        temp_dir.path().join("pyproject.toml"),
        "[project]\ndependencies = [\"requests==2.31.0\"]\n",
    )
    .unwrap();

    temp_dir
}

#[test]
fn test_resolved_project_exits_zero() {
    let temp_dir = create_resolvable_project();

    polydep()
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved (5)"))
        .stdout(predicate::str::contains("lodash"))
        .stdout(predicate::str::contains("4.17.21"))
        .stdout(predicate::str::contains("0 unresolved"));
}

#[test]
fn test_unresolved_project_exits_one() {
    let temp_dir = create_conflicting_project();

    polydep()
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unresolved (1)"))
        .stdout(predicate::str::contains("requests [python]: incompatible version ranges"))
        .stdout(predicate::str::contains("==2.28.0"))
        .stdout(predicate::str::contains("==2.31.0"));
}

#[test]
fn test_failed_ecosystem_exits_two() {
    let temp_dir = create_resolvable_project();
    fs::write(temp_dir.path().join("pom.xml"), "<project><dependencies>").unwrap();

    polydep()
        .arg(temp_dir.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Errors (1)"))
        .stdout(predicate::str::contains("java: failed to parse XML"))
        .stdout(predicate::str::contains("lodash"));
}

#[test]
fn test_json_output_schema() {
    let temp_dir = create_conflicting_project();

    let output = polydep()
        .arg(temp_dir.path())
        .arg("--json")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert!(json["generated_at"].is_string());

    let resolution = json["resolution"].as_array().unwrap();
    assert_eq!(resolution.len(), 1);
    assert_eq!(resolution[0]["package"], "requests");
    assert_eq!(resolution[0]["ecosystem"], "python");
    assert!(resolution[0]["version"].is_null());
    assert_eq!(resolution[0]["reason"], "incompatible_range");
    assert_eq!(resolution[0]["sources"].as_array().unwrap().len(), 2);

    let conflicts = json["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["reason"], "incompatible_range");
}

#[test]
fn test_ecosystem_filter() {
    let temp_dir = create_resolvable_project();

    let output = polydep()
        .arg(temp_dir.path())
        .args(["--json", "--rust"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let resolution = json["resolution"].as_array().unwrap();
    assert_eq!(resolution.len(), 1);
    assert_eq!(resolution[0]["package"], "serde");
    assert_eq!(resolution[0]["version"], "1.0.190");
}

#[test]
fn test_quiet_mode() {
    let temp_dir = create_conflicting_project();

    polydep()
        .arg(temp_dir.path())
        .arg("-q")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Resolved (").not())
        .stdout(predicate::str::contains("Unresolved (1)"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let temp_dir = create_resolvable_project();

    polydep()
        .arg(temp_dir.path())
        .arg("--verbose")
        .assert()
        .success()
        .stderr(predicate::str::contains("polydep v"))
        .stderr(predicate::str::contains("parsed manifest"))
        .stdout(predicate::str::contains("Python: 2 records"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let temp_dir = create_resolvable_project();

    polydep()
        .arg(temp_dir.path())
        .args(["--verbose", "--quiet"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("conflicting options"));
}

#[test]
fn test_missing_directory() {
    let temp_dir = tempfile::tempdir().unwrap();

    polydep()
        .arg(temp_dir.path().join("missing"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("directory not found"));
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = create_resolvable_project();
    fs::write(
        temp_dir.path().join("polydep.toml"),
        "[aliases]\nprotobuf = [\"cobol:protobuf\"]\n",
    )
    .unwrap();

    polydep()
        .arg(temp_dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid ecosystem 'cobol'"));
}

#[test]
fn test_explicit_config_with_aliases() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("requirements.txt"), "protobuf==4.25.0\n").unwrap();
    fs::write(
        temp_dir.path().join("build.gradle"),
        "dependencies {\n    implementation 'com.google.protobuf:protobuf-java:3.25.0'\n}\n",
    )
    .unwrap();

    let config_dir = TempDir::new().unwrap();
    let config = config_dir.path().join("aliases.toml");
    fs::write(
        &config,
        "[aliases]\nprotobuf = [\"python:protobuf\", \"java:com.google.protobuf:protobuf-java\"]\n",
    )
    .unwrap();

    polydep()
        .arg(temp_dir.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Declared in several ecosystems (1)"))
        .stdout(predicate::str::contains(
            "protobuf declared in python (protobuf), java (com.google.protobuf:protobuf-java)",
        ));
}

#[test]
fn test_empty_project() {
    let temp_dir = tempfile::tempdir().unwrap();

    polydep()
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No dependencies found."));
}
