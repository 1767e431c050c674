//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;

fn micseg_bin() -> Command {
    Command::cargo_bin("micseg").expect("binary builds")
}

#[test]
fn help_output() {
    micseg_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("microphone"))
        .stdout(predicate::str::contains("--daemon"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("mic"));
}

#[test]
fn version_output() {
    micseg_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("micseg"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn mic_help_lists_actions() {
    micseg_bin()
        .args(["mic", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("save"))
        .stdout(predicate::str::contains("finish"))
        .stdout(predicate::str::contains("reset-timer"))
        .stdout(predicate::str::contains("stop"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn config_help_lists_actions() {
    micseg_bin()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn config_path_command() {
    micseg_bin()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("micseg"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn no_args_is_usage_error() {
    micseg_bin()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Nothing to do"));
}

#[test]
fn mic_status_without_daemon_fails() {
    let runtime_dir = tempfile::tempdir().unwrap();

    micseg_bin()
        .env("XDG_RUNTIME_DIR", runtime_dir.path())
        .args(["mic", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No daemon running"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let config_home = tempfile::tempdir().unwrap();

    micseg_bin()
        .env("XDG_CONFIG_HOME", config_home.path())
        .args(["config", "set", "volume", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_rejects_non_numeric_bit_rate() {
    let config_home = tempfile::tempdir().unwrap();

    micseg_bin()
        .env("XDG_CONFIG_HOME", config_home.path())
        .args(["config", "set", "bit_rate", "fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("integer"));
}

#[test]
fn config_set_get_round_trip() {
    let config_home = tempfile::tempdir().unwrap();

    micseg_bin()
        .env("XDG_CONFIG_HOME", config_home.path())
        .args(["config", "set", "bit_rate", "64000"])
        .assert()
        .success();

    micseg_bin()
        .env("XDG_CONFIG_HOME", config_home.path())
        .args(["config", "get", "bit_rate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("64000"));
}

#[test]
fn config_get_unset_key() {
    let config_home = tempfile::tempdir().unwrap();

    micseg_bin()
        .env("XDG_CONFIG_HOME", config_home.path())
        .args(["config", "get", "output_dir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}

// Note: daemon round-trip tests (start/save/finish against a live daemon)
// need a microphone, so the recorder behavior is covered by the controller
// tests with a mock encoder instead.
