mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::ProjectFixture;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn check_json(fixture: &ProjectFixture, issue: &str) -> Value {
    let mut cmd = cargo_bin_cmd!("preflight");
    cmd.args(["check", "--format", "json", "--issue", issue])
        .arg(fixture.root());

    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).expect("valid json output")
}

#[test]
fn test_check_reports_clarification_as_json() {
    let fixture = ProjectFixture::new();
    let issue = "Add endpoint POST /users/{id}/export - exports personal data";
    let json = check_json(&fixture, issue);

    assert_eq!(json["halted_at"], "clarification");
    assert_eq!(json["outcome"]["status"], "needs_clarification");
    assert_eq!(json["outcome"]["questions"][0]["topic"], "issue_number");
    assert_eq!(json["issue"]["has_pii"], true);
}

#[test]
fn test_strict_exit_code_on_halt() {
    let fixture = ProjectFixture::new();
    cargo_bin_cmd!("preflight")
        .args(["check", "--plain", "--strict", "--issue", "Add export"])
        .arg(fixture.root())
        .assert()
        .code(2);
}

#[test]
fn test_strict_succeeds_when_ready_for_approval() {
    let fixture = ProjectFixture::documented();
    let out = cargo_bin_cmd!("preflight")
        .args([
            "check",
            "--plain",
            "--strict",
            "--issue",
            "Add model Receipt #8",
        ])
        .arg(fixture.root())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("# Implementation Plan (Validated Against Documentation)"));
    assert!(text.contains("- Branch: `feature/8-add-model-receipt`"));
}

#[test]
fn test_issue_file_and_output_file() {
    let fixture = ProjectFixture::new().with_file("issue.md", "Fix login redirect #88\n");
    let output = fixture.path("reports/run.json");

    cargo_bin_cmd!("preflight")
        .arg("check")
        .arg("--issue-file")
        .arg(fixture.path("issue.md"))
        .args(["--format", "json", "--output"])
        .arg(&output)
        .arg(fixture.root())
        .assert()
        .success();

    let json: Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(json["issue"]["number"], "88");
}

#[test]
fn test_check_requires_issue() {
    let fixture = ProjectFixture::new();
    cargo_bin_cmd!("preflight")
        .arg("check")
        .arg(fixture.root())
        .assert()
        .failure();
}

#[test]
fn test_invalid_config_is_an_error() {
    let config = "[consistency]\npii_glob = \"[\"\n";
    let fixture = ProjectFixture::new().with_file("custom.toml", config);
    let out = cargo_bin_cmd!("preflight")
        .args(["check", "--issue", "Add export #1", "--config"])
        .arg(fixture.path("custom.toml"))
        .arg(fixture.root())
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    assert!(String::from_utf8_lossy(&out).contains("Invalid glob '['"));
}

#[test]
fn test_scan_lists_findings() {
    let fixture = ProjectFixture::new().with_file(
        "app/views.py",
        "query = \"SELECT * FROM users WHERE id=%s\".format(uid)\n",
    );
    let out = cargo_bin_cmd!("preflight")
        .args(["scan", "--plain", "--glob", "**/*.py"])
        .arg(fixture.root())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("[CRITICAL]"));
    assert!(text.contains("app/views.py:1 - Potential SQL injection: string formatting in query"));
    assert!(text.contains("1 critical"));
}

#[test]
fn test_init_writes_config_once() {
    let dir = TempDir::new().unwrap();

    cargo_bin_cmd!("preflight")
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    assert!(dir.path().join(".preflight.toml").exists());

    let out = cargo_bin_cmd!("preflight")
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&out).contains("already exists"));

    cargo_bin_cmd!("preflight")
        .current_dir(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}
