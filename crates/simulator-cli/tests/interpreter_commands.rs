// crates/simulator-cli/tests/interpreter_commands.rs
// ============================================================================
// Module: CLI Interpreter Tests
// Description: Integration tests for the stdin-driven `interpreter` command.
// Purpose: Ensure one JSON response per command line and a shared ledger.
// Dependencies: simulator binary, serde_json
// ============================================================================

//! ## Overview
//! Streams `run` lines into the interpreter and checks response ids, error
//! kinds, audit output, and `SQLite` store cleanup.

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

use simulator_core::KeySpec;
use simulator_core::Param;
use simulator_core::StepRef;
use simulator_core::StepSpec;

use crate::common::QUIET_MEMORY_CONFIG;

/// Config with a relative `SQLite` store and no audit output.
const SQLITE_CONFIG: &str = r#"
[state_store]
type = "sqlite"
path = "state/simulator.db"

[audit]
sink = "none"
"#;

/// Interpreter line creating the `alice` Ed25519 key.
fn alice_line() -> String {
    common::step_line(&StepSpec::create_key(KeySpec::Ed25519("alice".to_string())))
}

// ============================================================================
// SECTION: Line Handling
// ============================================================================

#[test]
fn interpreter_shares_ledger_across_lines() {
    let dir = common::workspace(QUIET_MEMORY_CONFIG);
    let module = common::write_module(dir.path(), "counter.wasm");
    let lines = vec![
        alice_line(),
        common::step_line(&StepSpec::create_program(&module)),
        common::step_line(
            &StepSpec::execute(StepRef::new(1), "inc", 500, [Param::U64(2)])
                .with_caller_key("alice"),
        ),
    ];

    let output = common::interpret(dir.path(), &[], &lines);

    assert!(output.status.success());
    let responses = common::json_lines(&output);
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 0);
    assert!(responses[0]["error"].is_null());
    assert_eq!(responses[1]["id"], 1);
    assert!(responses[1]["result"]["id"].is_string());
    assert_eq!(responses[2]["id"], 2);
    assert_eq!(responses[2]["endpoint"], "execute");
    assert_eq!(responses[2]["error"]["kind"], "interpreter");
}

#[test]
fn interpreter_rejection_keeps_step_counter() {
    let dir = common::workspace(QUIET_MEMORY_CONFIG);
    let lines = vec![
        common::step_line(
            &StepSpec::execute(StepRef::new(7), "inc", 500, [Param::Bool(true)])
                .with_caller_key("alice"),
        ),
        alice_line(),
    ];

    let output = common::interpret(dir.path(), &[], &lines);

    let responses = common::json_lines(&output);
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 0);
    assert_eq!(responses[0]["error"]["kind"], "unresolved_step_reference");
    assert_eq!(responses[0]["endpoint"], "execute");
    assert_eq!(responses[1]["id"], 0);
    assert!(responses[1]["error"].is_null());
}

#[test]
fn interpreter_answers_garbage_with_malformed_plan() {
    let dir = common::workspace(QUIET_MEMORY_CONFIG);
    let lines = vec![
        "run --step '{\"endpoint\"".to_string(),
        "deploy --step {}".to_string(),
        "run".to_string(),
    ];

    let output = common::interpret(dir.path(), &[], &lines);

    assert!(output.status.success());
    let responses = common::json_lines(&output);
    assert_eq!(responses.len(), 3);
    for response in &responses {
        assert_eq!(response["id"], 0);
        assert_eq!(response["endpoint"], "");
        assert_eq!(response["error"]["kind"], "malformed_plan");
    }
    let message = responses[2]["error"]["message"].as_str().unwrap();
    assert!(message.contains("please specify either"));
}

#[test]
fn interpreter_skips_blank_lines() {
    let dir = common::workspace(QUIET_MEMORY_CONFIG);
    let lines = vec![String::new(), "   ".to_string(), alice_line(), String::new()];

    let output = common::interpret(dir.path(), &[], &lines);

    let responses = common::json_lines(&output);
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 0);
}

#[test]
fn interpreter_reads_step_files() {
    let dir = common::workspace(QUIET_MEMORY_CONFIG);
    let step_path = dir.path().join("alice.json");
    std::fs::write(
        &step_path,
        common::step_json(&StepSpec::create_key(KeySpec::Ed25519("alice".to_string()))),
    )
    .unwrap();
    let lines = vec![format!("run --file={}", step_path.display())];

    let output = common::interpret(dir.path(), &[], &lines);

    let responses = common::json_lines(&output);
    assert_eq!(responses.len(), 1);
    assert!(responses[0]["error"].is_null());
    let message = responses[0]["result"]["msg"].as_str().unwrap();
    assert!(message.starts_with("created named key with address "));
}

#[test]
fn interpreter_survives_non_utf8_line() {
    let dir = common::workspace(SQLITE_CONFIG);
    let mut input = Vec::new();
    input.extend_from_slice(alice_line().as_bytes());
    input.extend_from_slice(b"\n\xff\xfe\n");
    input.extend_from_slice(alice_line().as_bytes());
    input.push(b'\n');

    let output = common::interpret_bytes(dir.path(), &["--cleanup"], &input);

    assert!(output.status.success());
    let responses = common::json_lines(&output);
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 0);
    assert!(responses[0]["error"].is_null());
    assert_eq!(responses[1]["id"], 1);
    assert_eq!(responses[1]["error"]["kind"], "malformed_plan");
    assert_eq!(responses[2]["id"], 1);
    assert!(responses[2]["error"].is_null());
    assert_eq!(responses[0]["result"]["msg"], responses[2]["result"]["msg"]);
    assert!(!dir.path().join("state/simulator.db").exists());
}

// ============================================================================
// SECTION: Audit Output
// ============================================================================

#[test]
fn interpreter_log_level_filters_file_audit() {
    let dir = common::workspace("[audit]\nsink = \"file\"\npath = \"audit.jsonl\"\n");
    let lines = vec![alice_line(), "bogus".to_string()];

    let output = common::interpret(dir.path(), &["--log-level", "error"], &lines);

    assert!(output.status.success());
    let audit = std::fs::read_to_string(dir.path().join("audit.jsonl")).unwrap();
    let events: Vec<serde_json::Value> =
        audit.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event"], "step_rejected");
    assert_eq!(events[0]["error_kind"], "malformed_plan");
}

// ============================================================================
// SECTION: SQLite Sessions
// ============================================================================

#[test]
fn interpreter_cleanup_removes_database() {
    let dir = common::workspace(SQLITE_CONFIG);
    let output = common::interpret(dir.path(), &["--cleanup"], &[alice_line()]);

    assert!(output.status.success());
    assert_eq!(common::json_lines(&output).len(), 1);
    let db = dir.path().join("state/simulator.db");
    assert!(!db.exists());
    assert!(!dir.path().join("state/simulator.db-wal").exists());
}

#[test]
fn interpreter_reuses_keys_across_sessions() {
    let dir = common::workspace(SQLITE_CONFIG);

    let first = common::interpret(dir.path(), &[], &[alice_line()]);
    assert!(dir.path().join("state/simulator.db").exists());
    let second = common::interpret(dir.path(), &["--cleanup"], &[alice_line()]);

    let first = common::json_lines(&first);
    let second = common::json_lines(&second);
    assert_eq!(first[0]["result"]["msg"], second[0]["result"]["msg"]);
    assert_eq!(second[0]["id"], 0);
    assert!(!dir.path().join("state/simulator.db").exists());
}
