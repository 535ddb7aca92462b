// crates/simulator-cli/tests/config_commands.rs
// ============================================================================
// Module: CLI Config Command Tests
// Description: Integration tests for `config validate` and config discovery.
// Purpose: Ensure config errors surface before any step runs.
// Dependencies: simulator binary
// ============================================================================

//! ## Overview
//! Validates configuration files through the compiled binary.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::common::QUIET_MEMORY_CONFIG;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn config_validate_accepts_default_file() {
    let dir = common::workspace(QUIET_MEMORY_CONFIG);
    let output = common::run(dir.path(), &["config", "validate"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Config valid.");
}

#[test]
fn config_validate_rejects_sqlite_without_path() {
    let dir = common::workspace("[state_store]\ntype = \"sqlite\"\n");
    let output = common::run(dir.path(), &["config", "validate"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
    assert!(stderr.contains("sqlite state_store requires path"));
}

#[test]
fn config_validate_reports_missing_explicit_file() {
    let dir = common::workspace(QUIET_MEMORY_CONFIG);
    let output = common::run(dir.path(), &["config", "validate", "--config", "absent.toml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config io error"));
}

#[test]
fn config_env_override_is_honored() {
    let dir = common::workspace(QUIET_MEMORY_CONFIG);
    std::fs::write(dir.path().join("broken.toml"), "[limits]\nmax_plan_bytes = 0\n").unwrap();
    let output = common::simulator(dir.path())
        .args(["config", "validate"])
        .env("SIMULATOR_CONFIG", "broken.toml")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("limits.max_plan_bytes out of range"));
}

#[test]
fn run_fails_before_step_on_bad_config() {
    let dir = common::workspace("[audit]\nsink = \"file\"\n");
    let output = common::run(dir.path(), &["run", "--step", "{}"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("file audit sink requires path"));
    assert!(output.stdout.is_empty());
}

#[test]
fn version_flag_prints_version() {
    let dir = common::workspace(QUIET_MEMORY_CONFIG);
    let output = common::run(dir.path(), &["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("simulator "));
}
