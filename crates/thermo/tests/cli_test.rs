//! Integration tests for the `thermo` CLI binary.
//!
//! Argument parsing, help output, completions and config handling run
//! without a server; the schedule, override and summary commands run
//! against a wiremock scheduler.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `thermo` binary with env isolation.
///
/// Clears all `THERMO_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn thermo_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("thermo");
    cmd.env("HOME", "/tmp/thermo-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/thermo-cli-test-nonexistent")
        .env_remove("THERMO_PROFILE")
        .env_remove("THERMO_SERVER")
        .env_remove("THERMO_OUTPUT")
        .env_remove("THERMO_INSECURE")
        .env_remove("THERMO_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Same as [`thermo_cmd`] but with a writable config directory.
fn thermo_cmd_in(config_home: &Path) -> assert_cmd::Command {
    let mut cmd = thermo_cmd();
    cmd.env("HOME", config_home).env("XDG_CONFIG_HOME", config_home);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn scheduler() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/schedule"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schedule": {
                "0": [
                    { "when": "07:00", "zones": [{ "zone": 1, "temp": 20.0 }, { "zone": 2, "temp": 19.0 }] },
                    { "when": "18:00", "zones": [{ "zone": 1, "temp": 21.0 }] }
                ],
                "1": [], "2": [], "3": [], "4": [], "5": [], "6": []
            },
            "target_override": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "zones": [
                { "zone_id": 1, "name": "Living room", "target": 20.0,
                  "reported_state": { "current_temp": 19.5, "state": "on" },
                  "target_override": null },
                { "zone_id": 2, "name": "Bedroom", "target": 18.0,
                  "reported_state": null, "target_override": null }
            ],
            "server_day_of_week": 0,
            "today": [
                { "when": "07:00", "zones": [{ "zone": 1, "temp": 20.0 }] },
                { "when": "18:00", "zones": [{ "zone": 1, "temp": 21.0 }] }
            ],
            "target_entry": 1
        })))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = thermo_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    thermo_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("heating schedule")
            .and(predicate::str::contains("schedule"))
            .and(predicate::str::contains("override"))
            .and(predicate::str::contains("summary")),
    );
}

#[test]
fn test_version_flag() {
    thermo_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("thermo"));
}

#[test]
fn test_completions_bash() {
    thermo_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_missing_server_is_a_config_error() {
    let output = thermo_cmd().arg("summary").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(
        text.contains("No scheduler server configured"),
        "Expected config hint in output:\n{text}"
    );
}

#[test]
fn test_invalid_day_is_rejected() {
    thermo_cmd()
        .args(["--server", "http://127.0.0.1:9", "schedule", "show", "--day", "someday"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown day"));
}

#[test]
fn test_bad_zone_target_is_rejected() {
    thermo_cmd()
        .args([
            "--server", "http://127.0.0.1:9",
            "schedule", "add", "--day", "mon", "--time", "07:00", "--set", "1:20",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ZONE=TEMP"));
}

#[test]
fn test_bad_time_is_rejected() {
    thermo_cmd()
        .args([
            "--server", "http://127.0.0.1:9",
            "schedule", "add", "--day", "mon", "--time", "7:00", "--set", "1=20",
        ])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_profile_is_reported() {
    let output = thermo_cmd().args(["--profile", "upstairs", "zones"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("upstairs"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_uses_xdg_dir() {
    let dir = tempfile::tempdir().unwrap();
    thermo_cmd_in(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("thermo").and(predicate::str::contains("config.toml")));
}

#[test]
fn test_config_init_needs_server() {
    let dir = tempfile::tempdir().unwrap();
    thermo_cmd_in(dir.path())
        .args(["config", "init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--server"));
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    thermo_cmd_in(dir.path())
        .args(["--server", "http://boiler.local:5000", "config", "init"])
        .assert()
        .success();

    thermo_cmd_in(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("http://boiler.local:5000")
                .and(predicate::str::contains("[profiles.default]")),
        );

    // Same name again needs --force
    thermo_cmd_in(dir.path())
        .args(["--server", "http://other.local", "config", "init"])
        .assert()
        .code(6);
    thermo_cmd_in(dir.path())
        .args(["--server", "http://other.local", "config", "init", "--force"])
        .assert()
        .success();
    thermo_cmd_in(dir.path())
        .args(["-o", "plain", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default"));
}

// ── Server-backed commands ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_schedule_show_json() {
    let server = scheduler().await;
    let output = thermo_cmd()
        .args(["--server", server.uri().as_str(), "-o", "json", "schedule", "show", "--day", "mon"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let entries: Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["when"], "07:00");
    assert_eq!(entries[1]["when"], "18:00");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_schedule_add_duplicate_conflicts() {
    let server = scheduler().await;
    Mock::given(method("POST"))
        .and(path("/api/schedule/new_entry"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    thermo_cmd()
        .args([
            "--server", server.uri().as_str(),
            "schedule", "add", "--day", "mon", "--time", "07:00", "--set", "1=20",
        ])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("already exists"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_schedule_add_partial_save() {
    let server = scheduler().await;
    Mock::given(method("POST"))
        .and(path("/api/schedule/new_entry"))
        .and(body_string_contains("zone=1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/schedule/new_entry"))
        .and(body_string_contains("zone=2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let output = thermo_cmd()
        .args([
            "--server", server.uri().as_str(), "--color", "never",
            "schedule", "add", "--day", "mon", "--time", "12:00",
            "--set", "1=18", "--set", "2=17.5",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(9), "{}", combined_output(&output));
    let text = combined_output(&output);
    assert!(text.contains("Added 12:00 on Monday for zones 1"), "{text}");
    assert!(text.contains("failed: 2"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_schedule_remove_unknown_entry() {
    let server = scheduler().await;
    Mock::given(method("POST"))
        .and(path("/api/schedule/delete_entry"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    thermo_cmd()
        .args(["--server", server.uri().as_str(), "schedule", "remove", "--day", "tue", "--time", "07:00"])
        .assert()
        .code(4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_override_set_reports_expiry() {
    let server = scheduler().await;
    Mock::given(method("POST"))
        .and(path("/api/target_override"))
        .and(body_string_contains("zone=1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let output = thermo_cmd()
        .args([
            "--server", server.uri().as_str(), "-o", "json",
            "override", "set", "--zone", "1", "--temp", "23", "--hours", "2",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let view: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["zone"], 1);
    assert!(view["until"].is_string());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_summary_table() {
    let server = scheduler().await;
    thermo_cmd()
        .args(["--server", server.uri().as_str(), "--color", "never", "summary"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Living room")
                .and(predicate::str::contains("19.5"))
                .and(predicate::str::contains("Today (Monday)"))
                .and(predicate::str::contains("tomorrow")),
        );
}

#[test]
fn test_unreachable_server_exit_code() {
    let output = thermo_cmd()
        .args(["--server", "http://127.0.0.1:9", "--timeout", "2", "zones"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}
