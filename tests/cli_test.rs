use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_cli_help() {
    let mut cmd = cargo::cargo_bin_cmd!("linkwise");
    let assert = cmd.arg("--help").assert();

    // On Windows, the binary name in help might be "linkwise.exe"
    let expected_pattern = if cfg!(windows) {
        "linkwise.exe [OPTIONS] <SNAPSHOT>"
    } else {
        "linkwise [OPTIONS] <SNAPSHOT>"
    };

    assert
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains(expected_pattern));
}

#[test]
fn test_cli_requires_snapshot() {
    let mut cmd = cargo::cargo_bin_cmd!("linkwise");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("<SNAPSHOT>"));
}

#[test]
fn test_cli_json_output_is_clean() {
    let dir = tempdir().unwrap();
    let snapshot = dir.path().join("pages.json");
    fs::write(
        &snapshot,
        r#"[
            { "url": "https://a.test/coffee", "title": "Espresso Grinder Guide", "body_text": "Espresso grinder burrs." },
            { "url": "https://a.test/grinders", "title": "Espresso Grinder Reviews", "body_text": "Grinder reviews." }
        ]"#,
    )
    .unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();

    let mut cmd = cargo::cargo_bin_cmd!("linkwise");
    let output = cmd
        .arg(&snapshot)
        .args(["--mode", "links", "--output", "json", "--verbose"])
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["pages_analyzed"], 2);
    assert!(report["affiliate"].is_null());
}

#[test]
fn test_cli_reports_errors() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();

    let mut cmd = cargo::cargo_bin_cmd!("linkwise");
    cmd.arg(dir.path().join("missing.json"))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Failed to read snapshot"));
}
