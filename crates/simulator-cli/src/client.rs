// crates/simulator-cli/src/client.rs
// ============================================================================
// Module: Simulator Client
// Description: Drives a `simulator interpreter` child process from Rust.
// Purpose: Let Rust tests run plans through the binary's line protocol.
// Dependencies: serde_json, simulator-core, thiserror
// ============================================================================

//! ## Overview
//! [`ClientBuilder`] spawns `simulator interpreter` with its stdin and stdout
//! piped. [`Client`] writes one `run --step '<json>'` line per step and reads
//! back exactly one JSON [`Response`] line, so a plan built with
//! [`Plan`] can be exercised without writing JSON by hand.
//!
//! ```no_run
//! use simulator_cli::client::ClientBuilder;
//! use simulator_core::KeySpec;
//! use simulator_core::Plan;
//! use simulator_core::StepSpec;
//!
//! # fn main() -> Result<(), simulator_cli::client::ClientError> {
//! let mut client = ClientBuilder::new("target/debug/simulator").spawn()?;
//! let mut plan = Plan::new(Some("alice".to_string()));
//! plan.add_step(StepSpec::create_key(KeySpec::Ed25519("alice".to_string())));
//! let responses = client.run_plan(plan)?;
//! client.finish()?;
//! # let _ = responses;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::path::PathBuf;
use std::process::Child;
use std::process::ChildStdin;
use std::process::ChildStdout;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;

use simulator_core::Plan;
use simulator_core::Response;
use simulator_core::StepSpec;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while talking to the interpreter process.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Spawning, writing to, or reading from the process failed.
    #[error("interpreter io error: {0}")]
    Io(#[from] std::io::Error),
    /// The process was spawned without a piped stdin or stdout.
    #[error("interpreter {0} is not piped")]
    MissingPipe(&'static str),
    /// The process closed stdout before answering a step.
    #[error("interpreter closed its output before answering")]
    Eof,
    /// A step could not be encoded or a response line could not be decoded.
    #[error("interpreter payload error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Configures and spawns an interpreter process.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    /// Path to the `simulator` binary.
    program: PathBuf,
    /// Working directory of the process.
    current_dir: Option<PathBuf>,
    /// Explicit config file passed with `--config`.
    config: Option<PathBuf>,
    /// Remove the `SQLite` store when the session ends.
    cleanup: bool,
    /// Minimum audit level passed with `--log-level`.
    log_level: Option<&'static str>,
}

impl ClientBuilder {
    /// Starts a builder for the binary at `program`.
    ///
    /// Defaults to `--cleanup` and `--log-level error`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            current_dir: None,
            config: None,
            cleanup: true,
            log_level: Some("error"),
        }
    }

    /// Runs the process in `dir`, where relative config and store paths resolve.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Passes an explicit config file.
    #[must_use]
    pub fn config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(path.into());
        self
    }

    /// Keeps or removes the `SQLite` store when the session ends.
    #[must_use]
    pub const fn cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Overrides the audit level; `None` keeps the configured level.
    #[must_use]
    pub const fn log_level(mut self, level: Option<&'static str>) -> Self {
        self.log_level = level;
        self
    }

    /// Spawns the interpreter.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the process cannot be started.
    pub fn spawn(self) -> Result<Client, ClientError> {
        let mut command = Command::new(&self.program);
        command.arg("interpreter");
        if self.cleanup {
            command.arg("--cleanup");
        }
        if let Some(level) = self.log_level {
            command.args(["--log-level", level]);
        }
        if let Some(config) = &self.config {
            command.arg("--config").arg(config);
        }
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        let mut child = command.stdin(Stdio::piped()).stdout(Stdio::piped()).spawn()?;
        let writer = child.stdin.take().ok_or(ClientError::MissingPipe("stdin"))?;
        let reader = child.stdout.take().ok_or(ClientError::MissingPipe("stdout"))?;
        Ok(Client {
            child,
            writer,
            reader: BufReader::new(reader),
        })
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// A live interpreter session sharing one ledger across steps.
#[derive(Debug)]
pub struct Client {
    /// Interpreter process.
    child: Child,
    /// Process stdin.
    writer: ChildStdin,
    /// Buffered process stdout.
    reader: BufReader<ChildStdout>,
}

impl Client {
    /// Sends one step and returns its response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the step cannot be written or no response
    /// line comes back.
    pub fn run_step(&mut self, step: &StepSpec) -> Result<Response, ClientError> {
        let payload = serde_json::to_string(step)?;
        writeln!(self.writer, "run --step '{}'", payload.replace('\'', r"'\''"))?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ClientError::Eof);
        }
        Ok(serde_json::from_str(&line)?)
    }

    /// Runs the steps of `plan` in order with the plan caller key applied.
    ///
    /// Stops after the first failed step; its response is the last one
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the session breaks.
    pub fn run_plan(&mut self, plan: Plan) -> Result<Vec<Response>, ClientError> {
        let mut responses = Vec::with_capacity(plan.len());
        for step in plan.into_steps() {
            let response = self.run_step(&step)?;
            let failed = !response.is_success();
            responses.push(response);
            if failed {
                break;
            }
        }
        Ok(responses)
    }

    /// Closes the session and waits for the process to exit.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] when waiting on the process fails.
    pub fn finish(self) -> Result<ExitStatus, ClientError> {
        let Self {
            mut child,
            writer,
            ..
        } = self;
        drop(writer);
        Ok(child.wait()?)
    }
}
