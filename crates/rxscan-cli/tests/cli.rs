use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Temp dir holding a config whose session file lives next to it.
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    let store = dir.path().join("session.json");
    fs::write(
        &config,
        serde_json::json!({
            "storage": { "path": store },
            "api": { "base_url": "http://127.0.0.1:9", "timeout_secs": 1 }
        })
        .to_string(),
    )
    .unwrap();
    (dir, config)
}

fn rxscan(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rxscan").unwrap();
    cmd.arg("-c").arg(config);
    cmd
}

fn prescription(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_extract_text_file() {
    let (dir, config) = workspace();
    let rx = prescription(&dir, "rx.txt", "Tab. Metformin 500mg BD\nAspirin 81 mg OD");

    rxscan(&config)
        .arg("extract")
        .arg(&rx)
        .assert()
        .success()
        .stdout(predicate::str::contains("Detected medicines (2):"))
        .stdout(predicate::str::contains("- metformin"))
        .stdout(predicate::str::contains("- aspirin"));
}

#[test]
fn test_extract_nothing_found_is_not_an_error() {
    let (dir, config) = workspace();
    let rx = prescription(&dir, "rx.txt", "Take twice daily after food");

    rxscan(&config)
        .arg("extract")
        .arg(&rx)
        .assert()
        .success()
        .stdout(predicate::str::contains("No medicines detected"));
}

#[test]
fn test_extract_json_output() {
    let (dir, config) = workspace();
    let rx = prescription(&dir, "rx.txt", "amoxicilin 250");

    let output = rxscan(&config)
        .args(["extract", "--format", "json"])
        .arg(&rx)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["medicines"], serde_json::json!(["amoxicillin"]));
    assert_eq!(json["tier"], "fuzzy");
}

#[test]
fn test_extract_stdin() {
    let (_dir, config) = workspace();

    rxscan(&config)
        .args(["extract", "-", "--format", "csv"])
        .write_stdin("WARFARIN 5mg")
        .assert()
        .success()
        .stdout(predicate::str::contains("medicine\nwarfarin"));
}

#[test]
fn test_extract_missing_file_fails() {
    let (dir, config) = workspace();

    rxscan(&config)
        .arg("extract")
        .arg(dir.path().join("nope.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_slot_is_saved_to_session() {
    let (dir, config) = workspace();
    let rx_a = prescription(&dir, "a.txt", "aspirin");
    let rx_b = prescription(&dir, "b.txt", "warfarin");

    rxscan(&config).args(["extract", "--slot", "a"]).arg(&rx_a).assert().success();
    rxscan(&config).args(["extract", "--slot", "b"]).arg(&rx_b).assert().success();

    rxscan(&config)
        .args(["session", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Prescription A: aspirin"))
        .stdout(predicate::str::contains("Prescription B: warfarin"))
        .stdout(predicate::str::contains("Ready for conflict check: yes"));

    let saved = fs::read_to_string(dir.path().join("session.json")).unwrap();
    assert!(saved.contains("doctorA"));
}

#[test]
fn test_allergies_persist_and_reject_duplicates() {
    let (_dir, config) = workspace();

    rxscan(&config).args(["allergy", "add", "Penicillin"]).assert().success();
    rxscan(&config)
        .args(["allergy", "add", "penicillin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already"));

    rxscan(&config)
        .args(["allergy", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Penicillin"));

    rxscan(&config).args(["allergy", "remove", "Penicillin"]).assert().success();
    rxscan(&config)
        .args(["allergy", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No allergies recorded."));
}

#[test]
fn test_session_clear_keeps_allergies() {
    let (dir, config) = workspace();
    let rx = prescription(&dir, "a.txt", "metformin");

    rxscan(&config).args(["extract", "--slot", "a"]).arg(&rx).assert().success();
    rxscan(&config).args(["allergy", "add", "sulfa"]).assert().success();
    rxscan(&config).args(["session", "clear"]).assert().success();

    rxscan(&config)
        .args(["session", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Prescription A: (none)"))
        .stdout(predicate::str::contains("Allergies: sulfa"));
}

#[test]
fn test_check_without_medicines_fails() {
    let (_dir, config) = workspace();

    rxscan(&config)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("prescription A"));
}

#[test]
fn test_batch_csv() {
    let (dir, config) = workspace();
    prescription(&dir, "one.txt", "aspirin");
    prescription(&dir, "two.txt", "nothing here");

    let pattern = dir.path().join("*.txt");
    rxscan(&config)
        .args(["batch", "--format", "csv"])
        .arg(pattern.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("success,exact,aspirin"))
        .stdout(predicate::str::contains("two.txt,success,,,"));
}

#[test]
fn test_config_set_writes_the_selected_file() {
    let (dir, config) = workspace();
    let rx = prescription(&dir, "rx.txt", "metformin aspirin");

    rxscan(&config)
        .args(["config", "set", "extraction.max_results", "1"])
        .assert()
        .success();

    rxscan(&config)
        .args(["config", "get", "extraction.max_results"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(saved["extraction"]["max_results"], 1);
    assert_eq!(saved["api"]["base_url"], "http://127.0.0.1:9");

    rxscan(&config)
        .args(["extract", "--format", "json"])
        .arg(&rx)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""medicines":["metformin"]"#));
}
