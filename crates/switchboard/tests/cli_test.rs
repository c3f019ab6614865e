//! Integration tests for the `switchboard` CLI binary.
//!
//! Argument parsing, config management, and switch listing against a
//! wiremock-backed API. Every test points the config path at a temp dir so
//! the user's real configuration is never touched.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

fn switchboard_cmd(config: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("switchboard");
    cmd.env("SWITCHBOARD_CONFIG", config)
        .env("HOME", "/tmp/switchboard-cli-test-nonexistent")
        .env_remove("SWITCHBOARD_PROFILE")
        .env_remove("SWITCHBOARD_URL")
        .env_remove("SWITCHBOARD_USERNAME")
        .env_remove("SWITCHBOARD_PASSWORD")
        .env_remove("SWITCHBOARD_OUTPUT")
        .env_remove("SWITCHBOARD_INSECURE")
        .env_remove("SWITCHBOARD_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn temp_config() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    (dir, config)
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const EDGE: &str = "00:00:00:00:00:00:00:01";
const CORE: &str = "00:00:00:00:00:00:00:02";

async fn inventory_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/switch/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "switch_id": EDGE,
                "name": "ofsw-01",
                "common-name": "edge-east",
                "state": "ACTIVATED",
                "controller-switch": true
            },
            { "switch_id": CORE, "name": "ofsw-02", "pop-location": "AMS" }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/switch/{EDGE}/flows")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "flowid": "a", "maximum_bandwidth": 1000 },
            { "flowid": "b", "maximum_bandwidth": 2000 }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/switch/{CORE}/flows")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    server
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_blocking(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_dir, config) = temp_config();
    let output = switchboard_cmd(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let (_dir, config) = temp_config();
    switchboard_cmd(&config)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("switches").and(predicate::str::contains("config")));
}

#[test]
fn test_version_flag() {
    let (_dir, config) = temp_config();
    switchboard_cmd(&config)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("switchboard"));
}

#[test]
fn test_invalid_output_format() {
    let (_dir, config) = temp_config();
    let output = switchboard_cmd(&config)
        .args(["--output", "xml", "switches", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_override() {
    let (_dir, config) = temp_config();
    switchboard_cmd(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(config.display().to_string()));
}

#[test]
fn test_config_init_then_show() {
    let (_dir, config) = temp_config();
    switchboard_cmd(&config)
        .args([
            "config",
            "init",
            "--url",
            "https://kilda.lab:8080",
            "--username",
            "kilda",
            "--password-env",
            "KILDA_PW",
        ])
        .assert()
        .success();

    assert!(config.exists());
    switchboard_cmd(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.default]")
                .and(predicate::str::contains("https://kilda.lab:8080"))
                .and(predicate::str::contains("password_env = \"KILDA_PW\""))
                .and(predicate::str::contains("hasSwtStoreSetting = false")),
        );
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let (_dir, config) = temp_config();
    let init = |force: bool| {
        let mut cmd = switchboard_cmd(&config);
        cmd.args(["config", "init", "--url", "http://localhost:8080"]);
        if force {
            cmd.arg("--force");
        }
        cmd.output().unwrap()
    };

    assert!(init(false).status.success());
    let second = init(false);
    assert_eq!(second.status.code(), Some(2));
    assert!(combined_output(&second).contains("already exists"));
    assert!(init(true).status.success());
}

#[test]
fn test_config_init_rejects_bad_url() {
    let (_dir, config) = temp_config();
    switchboard_cmd(&config)
        .args(["config", "init", "--url", "not a url"])
        .assert()
        .code(2);
    assert!(!config.exists());
}

#[test]
fn test_config_discrepancy_persists_preference() {
    let (dir, config) = temp_config();
    switchboard_cmd(&config)
        .args(["config", "discrepancy", "on"])
        .assert()
        .success();

    let prefs = std::fs::read_to_string(dir.path().join("preferences.toml")).unwrap();
    assert!(prefs.contains("hasSwtStoreSetting = \"1\""), "{prefs}");

    switchboard_cmd(&config)
        .args(["config", "discrepancy", "off"])
        .assert()
        .success();
    let prefs = std::fs::read_to_string(dir.path().join("preferences.toml")).unwrap();
    assert!(prefs.contains("hasSwtStoreSetting = \"0\""), "{prefs}");
}

// ── Switches ────────────────────────────────────────────────────────

#[test]
fn test_switches_list_without_config() {
    let (_dir, config) = temp_config();
    switchboard_cmd(&config)
        .args(["switches", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No switch API configured"));
}

#[test]
fn test_unknown_profile_is_not_found() {
    let (_dir, config) = temp_config();
    switchboard_cmd(&config)
        .args(["--profile", "lab", "switches", "list"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("lab"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_switches_list_json_includes_flow_summaries() {
    let server = inventory_server().await;
    let (_dir, config) = temp_config();

    let mut cmd = switchboard_cmd(&config);
    cmd.args(["--url", &server.uri(), "-o", "json", "switches", "list"]);
    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let switches = body.as_array().unwrap();
    assert_eq!(switches.len(), 2);

    assert_eq!(switches[0]["switch_id"], EDGE);
    assert_eq!(switches[0]["noofflows"], 2);
    assert_eq!(switches[0]["sumofbandwidth"], "3.000");

    // Failed flow fetch degrades to a zero summary.
    assert_eq!(switches[1]["noofflows"], 0);
    assert_eq!(switches[1]["sumofbandwidth"], 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_switches_list_search_matches_alias() {
    let server = inventory_server().await;
    let (_dir, config) = temp_config();

    let mut cmd = switchboard_cmd(&config);
    cmd.args([
        "--url",
        &server.uri(),
        "-o",
        "plain",
        "switches",
        "list",
        "--no-flows",
        "--search",
        "EDGE",
    ]);
    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), EDGE);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_switches_list_table() {
    let server = inventory_server().await;
    let (_dir, config) = temp_config();

    let mut cmd = switchboard_cmd(&config);
    cmd.args(["--url", &server.uri(), "switches", "list"]);
    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("edge-east"), "{stdout}");
    assert!(stdout.contains("AMS"), "{stdout}");
    assert!(stdout.contains("3.000"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_switches_flows_single_switch() {
    let server = inventory_server().await;
    let (_dir, config) = temp_config();

    let mut cmd = switchboard_cmd(&config);
    cmd.args(["--url", &server.uri(), "-o", "json-compact", "switches", "flows", EDGE]);
    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        r#"{"sumofbandwidth":"3.000","noofflows":2}"#
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_switches_flows_unknown_switch() {
    let server = inventory_server().await;
    let (_dir, config) = temp_config();

    let mut cmd = switchboard_cmd(&config);
    cmd.args(["--url", &server.uri(), "switches", "flows", "00:ff"]);
    let output = run_blocking(cmd).await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("00:ff"));
}
