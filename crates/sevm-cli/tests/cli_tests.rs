//! CLI integration tests for sevm
//!
//! Tests command parsing, JSON output, config handling and fixture runs.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// Helper to run the CLI with arguments
fn run_sevm(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_sevm"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("sevm-evm-tests")
        .join("fixtures")
}

// ==================== Help & Version Tests ====================

#[test]
fn test_cli_help() {
    let output = run_sevm(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run"));
    assert!(stdout.contains("fixtures"));
    assert!(stdout.contains("--log-level"));
}

#[test]
fn test_cli_version() {
    let output = run_sevm(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("sevm"));
}

// ==================== Run Tests ====================

#[test]
fn test_run_outputs_json() {
    let output = run_sevm(&["run", "--code", "6003600401"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["halt"], "stopped");
    assert_eq!(json["stack"].as_array().map(|s| s.len()), Some(1));
    assert_eq!(json["steps"], 3);
    assert!(json.get("trace").is_none());
}

#[test]
fn test_run_revert_reports_data() {
    let output = run_sevm(&["run", "--code", "600160005360016000fd"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["halt"], "reverted");
    assert_eq!(json["return_data"], "0x01");
}

#[test]
fn test_run_fault_reported() {
    let output = run_sevm(&["run", "--code", "60016002fe"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["halt"], "invalid");
    assert_eq!(json["fault"], "invalid opcode: 0xfe");
}

#[test]
fn test_run_with_trace() {
    let output = run_sevm(&["run", "--code", "600100", "--trace"]);
    let json = stdout_json(&output);
    let trace = json["trace"].as_array().unwrap();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace[0]["pc"], 0);
    assert_eq!(trace[1]["stack_depth"], 1);
}

#[test]
fn test_run_with_env_and_config_files() {
    let dir = tempfile::tempdir().unwrap();
    let env_path = dir.path().join("env.toml");
    let config_path = dir.path().join("sevm.toml");
    fs::write(&env_path, "number = 42\n").unwrap();
    fs::write(&config_path, "step_limit = 1\n").unwrap();

    // NUMBER, STOP needs two steps
    let output = run_sevm(&[
        "run",
        "--code",
        "4300",
        "--env",
        env_path.to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
    ]);
    let json = stdout_json(&output);
    assert_eq!(json["halt"], "invalid");
    assert_eq!(json["fault"], "step limit exceeded (1 steps)");

    // The flag overrides the file
    let output = run_sevm(&[
        "run",
        "--code",
        "4300",
        "--env",
        env_path.to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
        "--step-limit",
        "10",
    ]);
    let json = stdout_json(&output);
    assert_eq!(json["halt"], "stopped");
    assert_eq!(json["stack"].as_array().map(|s| s.len()), Some(1));
}

#[test]
fn test_run_invalid_hex_fails() {
    let output = run_sevm(&["run", "--code", "0xzz"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--code"));
}

#[test]
fn test_run_missing_env_file_fails() {
    let output = run_sevm(&["run", "--code", "00", "--env", "/nonexistent/env.toml"]);
    assert!(!output.status.success());
}

// ==================== Fixture Tests ====================

#[test]
fn test_fixtures_bundled_pass() {
    let dir = fixtures_dir();
    let output = run_sevm(&["fixtures", dir.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stdout));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Failed:  0"));
}

#[test]
fn test_fixtures_failure_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"wrong": {"code": "600100", "stack": "2"}}"#).unwrap();

    let output = run_sevm(&["fixtures", path.to_str().unwrap()]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wrong"));
    assert!(stdout.contains("stack mismatch"));
}

#[test]
fn test_fixtures_missing_path() {
    let output = run_sevm(&["fixtures", "/nonexistent/fixtures"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("fixture path not found"));
}
