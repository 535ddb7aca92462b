// crates/simulator-core/tests/common/mod.rs
// ============================================================================
// Module: Simulator Core Test Fixtures
// Description: Scripted collaborators shared by core integration tests.
// ============================================================================

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use simulator_core::Address;
use simulator_core::Clock;
use simulator_core::Ed25519KeyStore;
use simulator_core::FileProgramLoader;
use simulator_core::InterpreterError;
use simulator_core::Invocation;
use simulator_core::InvocationOutcome;
use simulator_core::Parameter;
use simulator_core::PlanRunner;
use simulator_core::PlanRunnerConfig;
use simulator_core::ProgramId;
use simulator_core::ProgramInterpreter;
use simulator_core::StateStore;
use simulator_core::StepAuditEvent;
use simulator_core::StepAuditSink;

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Timestamp returned by [`FixedClock`].
pub const FIXED_TIME: u64 = 1_700_000_000;

/// Clock that always returns [`FIXED_TIME`].
pub struct FixedClock;

impl Clock for FixedClock {
    fn now_unix_secs(&self) -> u64 {
        FIXED_TIME
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink that keeps every event in a shared buffer.
#[derive(Clone, Default)]
pub struct RecordingAuditSink {
    events: Arc<Mutex<Vec<StepAuditEvent>>>,
}

impl RecordingAuditSink {
    pub fn events(&self) -> Vec<StepAuditEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(|event| event.event).collect()
    }
}

impl StepAuditSink for RecordingAuditSink {
    fn record(&self, event: &StepAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ============================================================================
// SECTION: Interpreter
// ============================================================================

/// Invocation captured by [`ScriptedInterpreter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program_id: ProgramId,
    pub method: String,
    pub params: Vec<Parameter>,
    pub max_units: u64,
    pub caller: Option<Address>,
}

/// Interpreter that replays queued outcomes and records every call.
#[derive(Clone, Default)]
pub struct ScriptedInterpreter {
    outcomes: Arc<Mutex<VecDeque<Result<InvocationOutcome, String>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedInterpreter {
    pub fn push_ok(&self, call_id: ProgramId, results: Vec<Option<Vec<u8>>>, balance: u64) {
        self.outcomes.lock().unwrap().push_back(Ok(InvocationOutcome {
            call_id,
            results,
            balance,
        }));
    }

    pub fn push_err(&self, message: &str) {
        self.outcomes.lock().unwrap().push_back(Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProgramInterpreter for ScriptedInterpreter {
    fn invoke(
        &self,
        _store: &mut dyn StateStore,
        invocation: &Invocation<'_>,
    ) -> Result<InvocationOutcome, InterpreterError> {
        self.calls.lock().unwrap().push(RecordedCall {
            program_id: invocation.program_id,
            method: invocation.method.to_string(),
            params: invocation.params.to_vec(),
            max_units: invocation.max_units,
            caller: invocation.caller,
        });
        match self.outcomes.lock().unwrap().pop_front() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(message)) => Err(InterpreterError::Execution(message)),
            None => Err(InterpreterError::Execution("no scripted outcome".to_string())),
        }
    }
}

// ============================================================================
// SECTION: Builders
// ============================================================================

pub type TestRunner = PlanRunner<Ed25519KeyStore, FileProgramLoader, ScriptedInterpreter>;

/// Builds a runner with a fixed clock and a recording audit sink.
pub fn runner(interpreter: &ScriptedInterpreter) -> (TestRunner, RecordingAuditSink) {
    let audit = RecordingAuditSink::default();
    let runner = PlanRunner::new(
        Ed25519KeyStore::new(),
        FileProgramLoader::default(),
        interpreter.clone(),
        PlanRunnerConfig::default(),
    )
    .with_clock(Box::new(FixedClock))
    .with_audit_sink(Box::new(audit.clone()));
    (runner, audit)
}

/// Writes a small program module into `dir` and returns its path.
pub fn write_module(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"\0asm\x01\0\0\0").unwrap();
    path
}

/// Builds a deterministic program id.
pub fn program_id(seed: u8) -> ProgramId {
    ProgramId::new([seed; 32])
}
