//! Integration tests for the `rotki-sync` binary.
//!
//! Backend-bound commands run against a wiremock server; everything else
//! runs without any backend at all.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the binary with env isolation.
///
/// Clears every `ROTKI_*` variable the CLI reads and points the config
/// directories at `home` so tests never touch a real configuration.
fn rotki_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("rotki-sync");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("ROTKI_DEFAULTS__POLL_INTERVAL_MS", "10")
        .env_remove("ROTKI_PROFILE")
        .env_remove("ROTKI_URL")
        .env_remove("ROTKI_OUTPUT")
        .env_remove("ROTKI_TIMEOUT")
        .env_remove("ROTKI_DEFAULT_PROFILE")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn envelope(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": result, "message": "" }))
}

async fn mount_task(server: &MockServer, task_id: u64, result: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/1/tasks/{task_id}")))
        .respond_with(envelope(json!({
            "status": "completed",
            "outcome": { "result": result, "message": "" }
        })))
        .mount(server)
        .await;
}

fn asset(name: &str, amount: &str) -> Value {
    json!({ "asset": name, "amount": amount, "usd_value": "0" })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = rotki_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    rotki_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("liquity")
            .and(predicate::str::contains("tokens"))
            .and(predicate::str::contains("tasks"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    rotki_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rotki-sync"));
}

#[test]
fn completions_zsh() {
    let home = TempDir::new().unwrap();
    rotki_cmd(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn unknown_module_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    rotki_cmd(&home)
        .args(["--module", "teleporter", "liquity", "balances"])
        .assert()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn config_path_points_into_config_home() {
    let home = TempDir::new().unwrap();
    rotki_cmd(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_init_then_show() {
    let home = TempDir::new().unwrap();
    rotki_cmd(&home)
        .args([
            "--profile",
            "work",
            "--url",
            "http://10.0.0.5:4242",
            "--premium",
            "--module",
            "liquity",
            "config",
            "init",
        ])
        .assert()
        .success();

    rotki_cmd(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.work]")
                .and(predicate::str::contains("http://10.0.0.5:4242"))
                .and(predicate::str::contains("liquity")),
        );

    rotki_cmd(&home)
        .args(["--output", "plain", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::diff("work\n"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let home = TempDir::new().unwrap();
    rotki_cmd(&home).args(["config", "init"]).assert().success();
    rotki_cmd(&home).args(["config", "init"]).assert().code(6);
    rotki_cmd(&home)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn unknown_profile_is_not_found() {
    let home = TempDir::new().unwrap();
    let output = rotki_cmd(&home)
        .args(["--profile", "ghost", "tasks", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("ghost"));
}

// ── Local validation ────────────────────────────────────────────────

#[test]
fn detection_on_bitcoin_is_unsupported() {
    let home = TempDir::new().unwrap();
    rotki_cmd(&home)
        .args(["tokens", "detect", "--chain", "btc", "--address", "bc1q"])
        .assert()
        .code(5);
}

#[test]
fn detection_needs_an_address() {
    let home = TempDir::new().unwrap();
    rotki_cmd(&home)
        .args(["tokens", "detect", "--chain", "eth"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("address"));
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn liquity_balances_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1/blockchains/eth/modules/liquity/balances"))
        .and(query_param("async_query", "true"))
        .respond_with(envelope(json!({ "task_id": 7 })))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(
        &server,
        7,
        json!({
            "0xA": {
                "collateral": asset("ETH", "10"),
                "debt": asset("LUSD", "1000"),
                "collateralization_ratio": "250",
                "liquidation_price": "1200.5",
                "active": true,
                "trove_id": 1
            }
        }),
    )
    .await;

    let home = TempDir::new().unwrap();
    let output = rotki_cmd(&home)
        .args(["--url", &server.uri(), "-m", "liquity", "-o", "json"])
        .args(["liquity", "balances"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["address"], "0xA");
    assert_eq!(parsed[0]["trove_id"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn liquity_modules_come_from_backend_settings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1/settings"))
        .respond_with(envelope(json!({ "active_modules": ["aave"] })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    rotki_cmd(&home)
        .args(["--url", &server.uri(), "liquity", "pools"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("liquity"));
}

#[tokio::test(flavor = "multi_thread")]
async fn liquity_events_need_premium() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1/blockchains/eth/modules/liquity/events/trove"))
        .respond_with(envelope(json!({ "task_id": 1 })))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    rotki_cmd(&home)
        .args(["--url", &server.uri(), "-m", "liquity", "liquity", "events"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("premium"));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_task_exits_with_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1/blockchains/eth/modules/liquity/pool"))
        .respond_with(envelope(json!({ "task_id": 3 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1/tasks/3"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({
            "result": {
                "status": "completed",
                "outcome": { "result": null, "message": "node unreachable", "status_code": 502 }
            },
            "message": ""
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    rotki_cmd(&home)
        .args(["--url", &server.uri(), "-m", "liquity", "liquity", "pools"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unreachable"));
}

#[tokio::test(flavor = "multi_thread")]
async fn detect_tokens_of_one_address() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/1/blockchains/optimism/tokens/detect"))
        .and(body_partial_json(json!({ "addresses": ["0xA"], "only_cache": false })))
        .respond_with(envelope(json!({ "task_id": 12 })))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(
        &server,
        12,
        json!({ "0xA": { "tokens": ["eip155:10/erc20:0xT"], "last_update_timestamp": 1_700_000_000 } }),
    )
    .await;

    let home = TempDir::new().unwrap();
    let output = rotki_cmd(&home)
        .args(["--url", &server.uri(), "-o", "json"])
        .args(["tokens", "detect", "-c", "optimism", "-a", "0xA"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["address"], "0xA");
    assert_eq!(parsed[0]["tokens"][0], "eip155:10/erc20:0xT");
}

#[tokio::test(flavor = "multi_thread")]
async fn tasks_list_merges_pending_and_completed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1/tasks"))
        .respond_with(envelope(json!({ "pending": [4], "completed": [2] })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    rotki_cmd(&home)
        .args(["--url", &server.uri(), "-o", "plain", "tasks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::diff("2\n4\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn repeated_address_is_detected_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/1/blockchains/eth/tokens/detect"))
        .and(body_partial_json(json!({ "addresses": ["0xA"] })))
        .respond_with(envelope(json!({ "task_id": 13 })))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(
        &server,
        13,
        json!({ "0xA": { "tokens": [], "last_update_timestamp": 1_700_000_000 } }),
    )
    .await;

    let home = TempDir::new().unwrap();
    rotki_cmd(&home)
        .args(["--url", &server.uri(), "-o", "plain"])
        .args(["tokens", "detect", "-c", "eth", "-a", "0xA", "-a", "0xA"])
        .assert()
        .success()
        .stdout(predicate::str::diff("0xA\n"));
}
