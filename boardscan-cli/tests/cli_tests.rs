//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the boardscan binary (found in target/debug when run
/// via cargo test).
fn boardscan_cli() -> Command {
    Command::cargo_bin("boardscan").unwrap()
}

/// Path to boardscan library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("boardscan")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = boardscan_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("KiCad"));
}

#[test]
fn test_cli_version() {
    let mut cmd = boardscan_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_summary_output() {
    let mut cmd = boardscan_cli();
    let path = fixtures_dir().join("demo.kicad_pcb");

    cmd.arg(path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("F.Cu"))
        .stdout(predicate::str::contains("GND"))
        .stdout(predicate::str::contains("Footprints (1)"));
}

#[test]
fn test_cli_json_output() {
    let mut cmd = boardscan_cli();
    let path = fixtures_dir().join("demo.kicad_pcb");

    cmd.arg(path).arg("--format").arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(parsed["header"]["version"], "20221018");
    assert!(parsed["layers"].as_array().unwrap().len() >= 6);
}

#[test]
fn test_cli_nonexistent_file() {
    let mut cmd = boardscan_cli();

    cmd.arg("does_not_exist.kicad_pcb");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_exit_codes() {
    let path = fixtures_dir().join("demo.kicad_pcb");

    let mut cmd = boardscan_cli();
    cmd.arg(&path);
    cmd.assert().code(0);

    let mut cmd = boardscan_cli();
    cmd.arg("nonexistent.kicad_pcb");
    cmd.assert().code(1);
}

#[test]
fn test_cli_malformed_input_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.kicad_pcb");
    std::fs::write(
        &path,
        "(kicad_pcb (version 20221018) (net 1 \"VCC\") (net 2 \"GND",
    )
    .unwrap();

    let mut cmd = boardscan_cli();
    cmd.arg(&path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("VCC"));
}

#[test]
fn test_cli_output_formats_are_different() {
    let path = fixtures_dir().join("demo.kicad_pcb");

    let mut cmd_summary = boardscan_cli();
    cmd_summary.arg(&path);
    let summary_output = cmd_summary.output().unwrap();

    let mut cmd_json = boardscan_cli();
    cmd_json.arg(&path).arg("--format").arg("json");
    let json_output = cmd_json.output().unwrap();

    assert_ne!(
        summary_output.stdout, json_output.stdout,
        "Different formats should produce different output"
    );
}
