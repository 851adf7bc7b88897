//! Integration tests for the `gwnly` CLI binary.
//!
//! Argument parsing, help output, shell completions and error handling run
//! without a server; the remaining tests point `--server` at a wiremock
//! instance that speaks the open API.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `gwnly` binary with env isolation.
///
/// Clears all `GWN_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn gwnly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("gwnly");
    cmd.env("HOME", "/tmp/gwnly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/gwnly-cli-test-nonexistent")
        .env_remove("GWN_PROFILE")
        .env_remove("GWN_SERVER")
        .env_remove("GWN_APP_ID")
        .env_remove("GWN_APP_SECRET")
        .env_remove("GWN_OUTPUT")
        .env_remove("GWN_INSECURE")
        .env_remove("GWN_DEFAULT_PROFILE")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary against `server` off the async runtime.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let mut argv = vec![
        "--server".to_owned(),
        server.uri(),
        "--app-id".to_owned(),
        "app-1".to_owned(),
        "--app-secret".to_owned(),
        "s3cret".to_owned(),
        "--color".to_owned(),
        "never".to_owned(),
    ];
    argv.extend(args.iter().map(|a| (*a).to_owned()));
    tokio::task::spawn_blocking(move || gwnly_cmd().args(argv).output().unwrap())
        .await
        .unwrap()
}

fn list(items: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "retCode": 0, "data": { "result": items } }))
}

async fn mount_gwn(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "tok", "expires_in": 7200 })),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oapi/v1.0.0/network/list"))
        .respond_with(list(json!([{ "id": 7, "name": "HQ" }])))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oapi/v1.0.0/ap/list"))
        .respond_with(list(json!([
            { "mac": "A1", "name": "Lobby", "status": 1, "clients": 1 },
            { "mac": "A2", "name": "Attic", "status": 0 }
        ])))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oapi/v1.0.0/client/list"))
        .respond_with(list(json!([
            { "clientId": "C1", "name": "Phone", "apId": "A1", "rssi": -55, "online": 1 }
        ])))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = gwnly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("Usage"),
        "Expected 'Usage' in output:\n{text}"
    );
}

#[test]
fn test_help_flag() {
    gwnly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Grandstream GWN")
            .and(predicate::str::contains("networks"))
            .and(predicate::str::contains("clients"))
            .and(predicate::str::contains("sensors")),
    );
}

#[test]
fn test_version_flag() {
    gwnly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gwnly"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    gwnly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    gwnly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_output_format() {
    let output = gwnly_cmd()
        .args(["--output", "xml", "networks"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("xml"));
}

#[test]
fn test_networks_without_credentials() {
    let output = gwnly_cmd().arg("networks").output().unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("No credentials"),
        "Expected missing-credentials error:\n{text}"
    );
}

#[test]
fn test_unknown_profile() {
    let output = gwnly_cmd()
        .args(["--profile", "lab", "networks"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("'lab'"));
}

#[test]
fn test_invalid_server_url() {
    let output = gwnly_cmd()
        .args([
            "--server",
            "ftp://eu.gwn.cloud",
            "--app-id",
            "a",
            "--app-secret",
            "s",
            "networks",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("server_url"));
}

#[test]
fn test_ap_and_client_filters_conflict() {
    let output = gwnly_cmd()
        .args(["sensors", "--ap", "A1", "--client", "C1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    gwnly_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_profiles_empty() {
    gwnly_cmd()
        .args(["config", "profiles", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

// ── Against a mock server ───────────────────────────────────────────

#[tokio::test]
async fn test_networks_json() {
    let server = MockServer::start().await;
    mount_gwn(&server).await;

    let output = run_against(&server, &["-o", "json", "networks"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed, json!([{ "id": 7, "name": "HQ" }]));
}

#[tokio::test]
async fn test_online_aps_plain() {
    let server = MockServer::start().await;
    mount_gwn(&server).await;

    let output = run_against(&server, &["-o", "plain", "aps", "--online"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "A1");
}

#[tokio::test]
async fn test_clients_table_shows_ap_name() {
    let server = MockServer::start().await;
    mount_gwn(&server).await;

    let output = run_against(&server, &["clients"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Phone"));
    assert!(stdout.contains("Lobby"));
}

#[tokio::test]
async fn test_clients_of_unknown_ap() {
    let server = MockServer::start().await;
    mount_gwn(&server).await;

    let output = run_against(&server, &["clients", "--ap", "ZZ"]).await;
    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test]
async fn test_client_sensors_plain() {
    let server = MockServer::start().await;
    mount_gwn(&server).await;

    let output = run_against(&server, &["-o", "plain", "sensors", "--client", "c1"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("C1_rssi=-55"), "{stdout}");
    assert!(stdout.contains("C1_ap=Lobby"), "{stdout}");
    assert!(!stdout.contains("A1_"), "{stdout}");
}

#[tokio::test]
async fn test_rejected_credentials_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;

    let output = run_against(&server, &["auth"]).await;
    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}
