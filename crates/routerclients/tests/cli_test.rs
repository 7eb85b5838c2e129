//! Integration tests for the `routerclients` CLI binary.
//!
//! These tests validate argument parsing, help output, completions and
//! error exit codes, all without a live router.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the binary with env isolation.
///
/// Clears all `ROUTERCLIENTS_*` env vars and points config directories at
/// a nonexistent path so tests never touch the user's real configuration.
fn routerclients_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("routerclients");
    cmd.env("HOME", "/tmp/routerclients-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/routerclients-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/routerclients-cli-test-nonexistent")
        .env_remove("ROUTERCLIENTS_PROFILE")
        .env_remove("ROUTERCLIENTS_HOST")
        .env_remove("ROUTERCLIENTS_TRANSPORT")
        .env_remove("ROUTERCLIENTS_PORT")
        .env_remove("ROUTERCLIENTS_USERNAME")
        .env_remove("ROUTERCLIENTS_PASSWORD")
        .env_remove("ROUTERCLIENTS_OUTPUT")
        .env_remove("ROUTERCLIENTS_INSECURE")
        .env_remove("ROUTERCLIENTS_TIMEOUT");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = routerclients_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    routerclients_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("fetch")
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_completions_bash() {
    routerclients_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("routerclients"));
}

#[test]
fn test_config_path_prints_toml_location() {
    routerclients_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Error exit codes ────────────────────────────────────────────────

#[test]
fn test_fetch_without_config_exits_3() {
    routerclients_cmd()
        .arg("fetch")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No router configured"));
}

#[test]
fn test_fetch_names_missing_field() {
    routerclients_cmd()
        .args(["fetch", "--host", "192.168.1.1", "--transport", "ssh"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("asus-ssh").and(predicate::str::contains("port")));
}

#[test]
fn test_unknown_transport_is_usage_error() {
    routerclients_cmd()
        .args(["fetch", "--host", "192.168.1.1", "--transport", "telnet"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("transport"));
}

#[test]
fn test_unknown_profile_exits_3() {
    routerclients_cmd()
        .args(["fetch", "--profile", "cabin"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("cabin"));
}

#[test]
fn test_unreachable_router_exits_7() {
    routerclients_cmd()
        .args([
            "fetch",
            "--host",
            "127.0.0.1",
            "--port",
            "1",
            "--transport",
            "http",
            "--username",
            "admin",
            "--password",
            "pw",
            "--timeout",
            "2",
        ])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_interval_is_rejected_by_parser() {
    routerclients_cmd()
        .args(["watch", "--interval", "soon"])
        .assert()
        .code(2);
}
