// crates/simulator-core/src/runtime/mod.rs
// ============================================================================
// Module: Simulator Runtime
// Description: Plan runner, step pipeline stages, and default collaborators.
// Purpose: Execute plan steps against a state store.
// Dependencies: crate::{core, interfaces}, ed25519-dalek, rand
// ============================================================================

//! ## Overview
//! Runtime modules implement the step pipeline (validator, resolver,
//! dispatcher, ledger, runner) and the default collaborators used by the
//! command-line front end. Every front end runs steps through
//! [`PlanRunner`] so that validation and reference resolution behave the same
//! everywhere.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod clock;
pub mod dispatcher;
pub mod interpreter;
pub mod keys;
pub mod ledger;
pub mod loader;
pub mod resolver;
pub mod runner;
pub mod store;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditLevel;
pub use audit::FileAuditSink;
pub use audit::FilteredAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::StepAuditEvent;
pub use audit::StepAuditSink;
pub use clock::SystemClock;
pub use dispatcher::StepDispatcher;
pub use interpreter::UnavailableInterpreter;
pub use keys::Ed25519KeyStore;
pub use keys::KEY_STORAGE_PREFIX;
pub use ledger::RunLedger;
pub use loader::DEFAULT_MAX_PROGRAM_BYTES;
pub use loader::FileProgramLoader;
pub use loader::PROGRAM_STORAGE_PREFIX;
pub use loader::program_storage_key;
pub use resolver::ParameterResolver;
pub use resolver::ResolvedStep;
pub use runner::PlanOutcome;
pub use runner::PlanRunner;
pub use runner::PlanRunnerConfig;
pub use runner::Rejection;
pub use store::InMemoryStateStore;
pub use validator::StepValidator;
