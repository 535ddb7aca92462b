// crates/simulator-core/src/lib.rs
// ============================================================================
// Module: Simulator Core Library
// Description: Public API surface for the plan step execution engine.
// Purpose: Expose step types, collaborator interfaces, and the plan runner.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Simulator core runs declarative plan steps (create a named key, create a
//! program, call a program, or call it read-only) sequentially against a
//! shared key/value state store. Steps may reference identifiers produced by
//! earlier steps with the symbolic form `step_N`, and named keys by name.
//!
//! Storage, key generation, program loading, and program execution are
//! reached only through the traits in [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::Clock;
pub use interfaces::InterpreterError;
pub use interfaces::Invocation;
pub use interfaces::InvocationOutcome;
pub use interfaces::KeyStore;
pub use interfaces::KeyStoreError;
pub use interfaces::LoaderError;
pub use interfaces::ProgramInterpreter;
pub use interfaces::ProgramLoader;
pub use interfaces::StateStore;
pub use interfaces::StoreError;
pub use runtime::AuditLevel;
pub use runtime::Ed25519KeyStore;
pub use runtime::FileAuditSink;
pub use runtime::FileProgramLoader;
pub use runtime::FilteredAuditSink;
pub use runtime::InMemoryStateStore;
pub use runtime::NoopAuditSink;
pub use runtime::ParameterResolver;
pub use runtime::PlanOutcome;
pub use runtime::PlanRunner;
pub use runtime::PlanRunnerConfig;
pub use runtime::Rejection;
pub use runtime::ResolvedStep;
pub use runtime::RunLedger;
pub use runtime::StderrAuditSink;
pub use runtime::StepAuditEvent;
pub use runtime::StepAuditSink;
pub use runtime::StepDispatcher;
pub use runtime::StepValidator;
pub use runtime::SystemClock;
pub use runtime::UnavailableInterpreter;
