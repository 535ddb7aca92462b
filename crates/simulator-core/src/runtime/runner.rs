// crates/simulator-core/src/runtime/runner.rs
// ============================================================================
// Module: Simulator Plan Runner
// Description: Orchestrates validation, resolution, dispatch, and recording.
// Purpose: Run plan steps sequentially against one shared state store.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! A [`PlanRunner`] owns the [`RunLedger`] for one run and borrows the state
//! store per call. Each step goes through the same pipeline:
//!
//! load → validate → resolve → dispatch → record → advance
//!
//! Validation and resolution failures are returned as `Err` and leave the
//! ledger untouched; callers treat them as fatal to the run. Dispatch failures
//! are carried inside the returned [`Response`] and the step counter still
//! advances so later step numbers stay stable. [`PlanRunner::respond`] folds
//! both outcomes into a single [`Response`] for line-oriented hosts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::DEFAULT_MAX_PLAN_BYTES;
use crate::core::Plan;
use crate::core::PlanSource;
use crate::core::Response;
use crate::core::StepError;
use crate::core::StepSpec;
use crate::interfaces::Clock;
use crate::interfaces::KeyStore;
use crate::interfaces::ProgramInterpreter;
use crate::interfaces::ProgramLoader;
use crate::interfaces::StateStore;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::audit::StepAuditEvent;
use crate::runtime::audit::StepAuditSink;
use crate::runtime::clock::SystemClock;
use crate::runtime::dispatcher::StepDispatcher;
use crate::runtime::ledger::RunLedger;
use crate::runtime::resolver::ParameterResolver;
use crate::runtime::validator::StepValidator;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Plan runner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanRunnerConfig {
    /// Maximum size of a plan payload in bytes.
    pub max_plan_bytes: usize,
}

impl Default for PlanRunnerConfig {
    fn default() -> Self {
        Self {
            max_plan_bytes: DEFAULT_MAX_PLAN_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Step that halted a plan run before dispatch.
#[derive(Debug)]
pub struct Rejection {
    /// Index the rejected step would have had.
    pub step: usize,
    /// Validation or resolution failure.
    pub error: StepError,
}

/// Result of running a whole plan.
#[derive(Debug, Default)]
pub struct PlanOutcome {
    /// One response per dispatched step, in order.
    pub responses: Vec<Response>,
    /// Step that halted the run, if any.
    pub rejection: Option<Rejection>,
}

impl PlanOutcome {
    /// Returns true when every step was dispatched and succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.rejection.is_none() && self.responses.iter().all(Response::is_success)
    }
}

// ============================================================================
// SECTION: Plan Runner
// ============================================================================

/// Sequential plan step executor.
pub struct PlanRunner<K, L, I> {
    /// Named key store.
    keys: K,
    /// Program loader.
    loader: L,
    /// Program interpreter.
    interpreter: I,
    /// Completion timestamp source.
    clock: Box<dyn Clock>,
    /// Step lifecycle audit sink.
    audit: Box<dyn StepAuditSink>,
    /// Runner configuration.
    config: PlanRunnerConfig,
    /// Identifiers and step counter for this run.
    ledger: RunLedger,
}

impl<K, L, I> PlanRunner<K, L, I>
where
    K: KeyStore,
    L: ProgramLoader,
    I: ProgramInterpreter,
{
    /// Creates a runner with the system clock and no audit output.
    #[must_use]
    pub fn new(keys: K, loader: L, interpreter: I, config: PlanRunnerConfig) -> Self {
        Self {
            keys,
            loader,
            interpreter,
            clock: Box::new(SystemClock),
            audit: Box::new(NoopAuditSink),
            config,
            ledger: RunLedger::new(),
        }
    }

    /// Replaces the completion timestamp source.
    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Box<dyn StepAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the run ledger.
    #[must_use]
    pub const fn ledger(&self) -> &RunLedger {
        &self.ledger
    }

    /// Loads one step from `source` and runs it.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] when the step cannot be loaded, validated, or
    /// resolved. Dispatch failures are reported inside the response.
    pub fn run(
        &mut self,
        store: &mut dyn StateStore,
        source: &PlanSource,
    ) -> Result<Response, StepError> {
        let spec = self.load_step(source)?;
        self.run_spec(store, &spec)
    }

    /// Loads and runs one step, folding a rejection into the response.
    ///
    /// A rejected step yields a response with its error set and the step
    /// counter unchanged, so hosts always have exactly one response to emit.
    pub fn respond(&mut self, store: &mut dyn StateStore, source: &PlanSource) -> Response {
        let spec = match self.load_step(source) {
            Ok(spec) => spec,
            Err(err) => return self.rejection_response("", "", &err),
        };
        match self.run_spec(store, &spec) {
            Ok(response) => response,
            Err(err) => self.rejection_response(&spec.endpoint, &spec.method, &err),
        }
    }

    /// Records and answers a step that never produced a source, such as an
    /// unparsable host command line.
    #[must_use]
    pub fn reject(&self, error: &StepError) -> Response {
        self.audit.record(&StepAuditEvent::rejected(
            self.ledger.next_step(),
            "",
            "",
            error.kind(),
            error.to_string(),
        ));
        self.rejection_response("", "", error)
    }

    /// Builds a timestamped response for a rejected step.
    fn rejection_response(&self, endpoint: &str, method: &str, error: &StepError) -> Response {
        let mut response = Response::rejected(self.ledger.next_step(), endpoint, method, error);
        response.set_timestamp(self.clock.now_unix_secs());
        response
    }

    /// Runs one already-parsed step.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] when the step cannot be validated or resolved.
    pub fn run_spec(
        &mut self,
        store: &mut dyn StateStore,
        spec: &StepSpec,
    ) -> Result<Response, StepError> {
        let index = self.ledger.next_step();
        let resolved = StepValidator::verify(index, spec)
            .and_then(|step| ParameterResolver::new(&self.ledger, &self.keys).resolve(store, &step))
            .inspect_err(|err| {
                self.audit.record(&StepAuditEvent::rejected(
                    index,
                    &spec.endpoint,
                    &spec.method,
                    err.kind(),
                    err.to_string(),
                ));
            })?;

        self.audit.record(&StepAuditEvent::started(
            index,
            &spec.endpoint,
            &spec.method,
            resolved.unit_budget(),
            resolved.params.iter().map(|param| param.param_type.to_string()).collect(),
        ));

        let dispatcher = StepDispatcher::new(
            &self.keys,
            &self.loader,
            &self.interpreter,
            self.clock.as_ref(),
            self.audit.as_ref(),
        );
        let response = dispatcher.execute(store, index, &resolved);

        match &response.error {
            None => {
                if let Some(id) = response.generated_id() {
                    self.ledger.record(index, id);
                }
                self.audit.record(&StepAuditEvent::completed(index, &spec.endpoint, &spec.method));
            }
            Some(error) => {
                self.audit.record(&StepAuditEvent::failed(
                    index,
                    &spec.endpoint,
                    &spec.method,
                    error.kind,
                    error.message.clone(),
                ));
            }
        }
        self.ledger.advance();
        Ok(response)
    }

    /// Reads and parses one step, auditing a rejection on failure.
    fn load_step(&self, source: &PlanSource) -> Result<StepSpec, StepError> {
        source.load(self.config.max_plan_bytes).inspect_err(|err| {
            self.audit.record(&StepAuditEvent::rejected(
                self.ledger.next_step(),
                "",
                "",
                err.kind(),
                err.to_string(),
            ));
        })
    }

    /// Runs every step of `plan` in order, halting at the first rejection.
    pub fn run_plan(&mut self, store: &mut dyn StateStore, plan: Plan) -> PlanOutcome {
        let mut outcome = PlanOutcome::default();
        for spec in plan.into_steps() {
            let step = self.ledger.next_step();
            match self.run_spec(store, &spec) {
                Ok(response) => outcome.responses.push(response),
                Err(error) => {
                    outcome.rejection = Some(Rejection {
                        step,
                        error,
                    });
                    break;
                }
            }
        }
        outcome
    }
}
