// crates/simulator-cli/tests/common/mod.rs
// ============================================================================
// Module: CLI Test Helpers
// Description: Shared process helpers for simulator binary tests.
// Purpose: Run the compiled binary inside an isolated working directory.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::process::Stdio;

use serde_json::Value;
use simulator_core::StepSpec;
use tempfile::TempDir;

/// Config that keeps audit output off stderr.
pub const QUIET_MEMORY_CONFIG: &str = "[audit]\nsink = \"none\"\n";

/// Returns the path of the compiled `simulator` binary.
pub fn simulator_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_simulator"))
}

/// Creates a working directory holding `simulator.toml` with `config`.
pub fn workspace(config: &str) -> TempDir {
    let temp = TempDir::new().expect("temp dir");
    std::fs::write(temp.path().join("simulator.toml"), config).expect("write config");
    temp
}

/// Builds a command rooted in `dir` with no config override from the environment.
pub fn simulator(dir: &Path) -> Command {
    let mut command = Command::new(simulator_bin());
    command.current_dir(dir).env_remove("SIMULATOR_CONFIG");
    command
}

/// Runs the binary with `args` in `dir`.
pub fn run(dir: &Path, args: &[&str]) -> Output {
    simulator(dir).args(args).output().expect("run simulator")
}

/// Runs `interpreter` in `dir`, feeding `lines` on stdin.
pub fn interpret(dir: &Path, extra_args: &[&str], lines: &[String]) -> Output {
    let mut input = Vec::new();
    for line in lines {
        input.extend_from_slice(line.as_bytes());
        input.push(b'\n');
    }
    interpret_bytes(dir, extra_args, &input)
}

/// Runs `interpreter` in `dir`, feeding raw `input` bytes on stdin.
pub fn interpret_bytes(dir: &Path, extra_args: &[&str], input: &[u8]) -> Output {
    let mut child = simulator(dir)
        .arg("interpreter")
        .args(extra_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn interpreter");
    {
        let mut stdin = child.stdin.take().expect("stdin");
        stdin.write_all(input).expect("write input");
    }
    child.wait_with_output().expect("interpreter output")
}

/// Parses stdout as one JSON value per line.
pub fn json_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect()
}

/// Serializes a step to its wire JSON.
pub fn step_json(step: &StepSpec) -> String {
    serde_json::to_string(step).expect("step json")
}

/// Formats an interpreter `run --step` line for a step.
pub fn step_line(step: &StepSpec) -> String {
    format!("run --step '{}'", step_json(step))
}

/// Writes a small program module into `dir`.
pub fn write_module(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"\0asm\x01\0\0\0").expect("write module");
    path
}
