//! CLI command integration tests.
//! Each test points LUX_CONFIG at a temp directory so no user config leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lux_cmd(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("lux").unwrap();
    cmd.env("LUX_CONFIG", dir.path().join("lux.toml"));
    cmd
}

#[test]
fn encode_prints_sequence_and_codes() {
    let dir = TempDir::new().unwrap();
    lux_cmd(&dir)
        .args(["encode", "quantum diamond heartbeat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("symbols:    Violet Red Green"))
        .stdout(predicate::str::contains("coherence:  0.50"))
        .stdout(predicate::str::contains("binary:     110000011"))
        .stdout(predicate::str::contains(format!("hex:        0x{}183", "0".repeat(61))));
}

#[test]
fn encode_json_output() {
    let dir = TempDir::new().unwrap();
    let output = lux_cmd(&dir)
        .args(["encode", "--json", "love and truth."])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["sequence"]["colors"].as_array().unwrap().len(), 3);
    assert_eq!(json["hex"].as_str().unwrap().len(), 66);
    assert_eq!(json["fitsWord256"], true);
}

#[test]
fn encode_empty_text() {
    let dir = TempDir::new().unwrap();
    lux_cmd(&dir)
        .args(["encode", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("hex:        0x{}", "0".repeat(64))));
}

#[test]
fn visualize_card() {
    let dir = TempDir::new().unwrap();
    lux_cmd(&dir)
        .args(["visualize", "love and truth.", "--category", "poetry", "--resonance", "warm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Light Memory: light_"))
        .stdout(predicate::str::contains("Resonance: warm"))
        .stdout(predicate::str::contains("Category:  poetry"));
}

#[test]
fn config_defaults_when_file_missing() {
    let dir = TempDir::new().unwrap();
    lux_cmd(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("# defaults"))
        .stdout(predicate::str::contains("timeout_ms = 5000"))
        .stdout(predicate::str::contains("limit = 100"));
}

#[test]
fn config_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(
        &path,
        "[ledger]\nendpoint = \"http://127.0.0.1:8545/memory\"\ntimeout_ms = 90000\n",
    )
    .unwrap();

    lux_cmd(&dir)
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("loaded from"))
        .stdout(predicate::str::contains("http://127.0.0.1:8545/memory"))
        .stdout(predicate::str::contains("effective ledger timeout: 30000ms"));
}

#[test]
fn config_rejects_malformed_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("lux.toml"), "[ledger\n").unwrap();
    lux_cmd(&dir)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}
