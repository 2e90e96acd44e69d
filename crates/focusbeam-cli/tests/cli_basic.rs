//! Basic CLI E2E tests.
//!
//! Each test points HOME at a fresh temp dir so the config file never
//! touches the real user directory.

use std::io::{BufRead, BufReader, Read};
use std::process::Stdio;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("focusbeam").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("FOCUSBEAM_ENV")
        .env_remove("FOCUSBEAM_LOG");
    cmd
}

#[test]
fn test_config_list() {
    let home = TempDir::new().unwrap();
    let output = cli(&home).args(["config", "list"]).output().unwrap();
    assert!(output.status.success(), "Config list failed");

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["durations"]["focus"], 45);
    assert_eq!(json["durations"]["short_break"], 10);
    assert_eq!(json["durations"]["long_break"], 20);
    assert_eq!(json["timer"]["start_type"], "focus");
}

#[test]
fn test_config_get() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "get", "durations.focus"])
        .assert()
        .success()
        .stdout("45\n");
}

#[test]
fn test_config_set_then_get() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "set", "durations.long_break", "30"])
        .assert()
        .success()
        .stdout("ok\n");
    cli(&home)
        .args(["config", "get", "durations.long_break"])
        .assert()
        .success()
        .stdout("30\n");
}

#[test]
fn test_config_set_out_of_range() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "set", "durations.short_break", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "get", "durations.nap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key"));
}

#[test]
fn test_config_reset() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "set", "durations.focus", "90"])
        .assert()
        .success();
    cli(&home).args(["config", "reset"]).assert().success();
    cli(&home)
        .args(["config", "get", "durations.focus"])
        .assert()
        .success()
        .stdout("45\n");
}

#[test]
fn test_config_path_uses_home() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".config/focusbeam/config.toml"));
}

#[test]
fn test_config_path_dev_env() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .env("FOCUSBEAM_ENV", "dev")
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("focusbeam-dev"));
}

#[test]
fn test_timer_rejects_unknown_type() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["timer", "--type", "nap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown session type"));
}

#[test]
fn test_run_requires_tty() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("run")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("tty"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("focusbeam"));
}

#[test]
fn test_timer_clamps_minutes_and_starts() {
    let home = TempDir::new().unwrap();
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("focusbeam"))
        .args(["timer", "--type", "short_break", "--minutes", "1"])
        .env("HOME", home.path())
        .env_remove("FOCUSBEAM_ENV")
        .env_remove("FOCUSBEAM_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut first = String::new();
    BufReader::new(child.stdout.take().unwrap())
        .read_line(&mut first)
        .unwrap();
    child.kill().unwrap();
    child.wait().unwrap();

    assert_eq!(first.trim_end(), "Short Break 03:00");
}

#[cfg(unix)]
#[test]
fn test_timer_interrupt_prints_stats() {
    let home = TempDir::new().unwrap();
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("focusbeam"))
        .args(["timer", "--type", "focus"])
        .env("HOME", home.path())
        .env_remove("FOCUSBEAM_ENV")
        .env_remove("FOCUSBEAM_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut stdout = BufReader::new(child.stdout.take().unwrap());
    let mut first = String::new();
    stdout.read_line(&mut first).unwrap();
    assert_eq!(first.trim_end(), "Focus 45:00");

    let status = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();
    assert!(child.wait().unwrap().success());
    assert!(rest.contains("Completed focus blocks: 0  Total focus: 0 min"));
}
