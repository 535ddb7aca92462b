// crates/simulator-core/src/runtime/dispatcher.rs
// ============================================================================
// Module: Simulator Step Dispatcher
// Description: Routes resolved steps to the key, loader, and interpreter.
// Purpose: Execute one step and capture its outcome in a response.
// Dependencies: crate::core, crate::interfaces, crate::runtime::audit
// ============================================================================

//! ## Overview
//! [`StepDispatcher::execute`] is the only code path that mutates the state
//! store during a run. It never returns an error: every failure is captured
//! into the returned [`Response`], and the completion timestamp is stamped on
//! every exit path.
//!
//! Endpoint semantics:
//! - `key`: create a named key. An existing name is reused, not an error.
//! - `execute` with [`PROGRAM_CREATE_METHOD`]: load a program module and
//!   report the generated program id.
//! - `execute` otherwise: call the program with the step's unit budget and
//!   report the call id, the single result payload, and the caller balance.
//! - `readonly`: call the program with an unlimited budget; no call id and no
//!   balance are reported.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use crate::core::Address;
use crate::core::Endpoint;
use crate::core::PROGRAM_CREATE_METHOD;
use crate::core::PROGRAM_ID_LEN;
use crate::core::ParamType;
use crate::core::Parameter;
use crate::core::ProgramId;
use crate::core::Response;
use crate::core::StepError;
use crate::interfaces::Clock;
use crate::interfaces::Invocation;
use crate::interfaces::KeyStore;
use crate::interfaces::KeyStoreError;
use crate::interfaces::ProgramInterpreter;
use crate::interfaces::ProgramLoader;
use crate::interfaces::StateStore;
use crate::runtime::audit::StepAuditEvent;
use crate::runtime::audit::StepAuditSink;
use crate::runtime::resolver::ResolvedStep;

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Executes resolved steps against the external collaborators.
pub struct StepDispatcher<'a, K: ?Sized, L: ?Sized, I: ?Sized> {
    /// Named key store.
    keys: &'a K,
    /// Program loader.
    loader: &'a L,
    /// Program interpreter.
    interpreter: &'a I,
    /// Completion timestamp source.
    clock: &'a dyn Clock,
    /// Audit sink for tolerated conditions.
    audit: &'a dyn StepAuditSink,
}

impl<'a, K, L, I> StepDispatcher<'a, K, L, I>
where
    K: KeyStore + ?Sized,
    L: ProgramLoader + ?Sized,
    I: ProgramInterpreter + ?Sized,
{
    /// Creates a dispatcher over the given collaborators.
    #[must_use]
    pub fn new(
        keys: &'a K,
        loader: &'a L,
        interpreter: &'a I,
        clock: &'a dyn Clock,
        audit: &'a dyn StepAuditSink,
    ) -> Self {
        Self {
            keys,
            loader,
            interpreter,
            clock,
            audit,
        }
    }

    /// Executes step `index` and returns its response.
    pub fn execute(
        &self,
        store: &mut dyn StateStore,
        index: usize,
        step: &ResolvedStep,
    ) -> Response {
        let mut response = Response::new(index, step.endpoint.as_str(), step.method.as_str());
        if let Err(err) = self.dispatch(store, index, step, &mut response) {
            response.set_error(&err);
        }
        response.set_timestamp(self.clock.now_unix_secs());
        response
    }

    /// Routes the step to its endpoint handler.
    fn dispatch(
        &self,
        store: &mut dyn StateStore,
        index: usize,
        step: &ResolvedStep,
        response: &mut Response,
    ) -> Result<(), StepError> {
        match step.endpoint {
            Endpoint::Key => self.create_key(store, index, step, response),
            // Program creation shares the execute endpoint; the method name
            // selects the loader instead of the interpreter.
            Endpoint::Execute if step.method == PROGRAM_CREATE_METHOD => {
                self.create_program(store, index, step, response)
            }
            Endpoint::Execute | Endpoint::ReadOnly => self.call(store, index, step, response),
        }
    }

    /// Creates or reuses the named key in the first parameter.
    fn create_key(
        &self,
        store: &mut dyn StateStore,
        index: usize,
        step: &ResolvedStep,
        response: &mut Response,
    ) -> Result<(), StepError> {
        let param = first_param(index, step)?;
        if param.param_type == ParamType::KeySecp256k1 {
            return Err(StepError::Unsupported(
                "secp256k1 named keys are not supported".to_string(),
            ));
        }
        let name = param.as_text().ok_or_else(|| {
            StepError::NamedKeyNotFound(String::from_utf8_lossy(&param.value).into_owned())
        })?;
        let public_key = match self.keys.create_named_key(store, name) {
            Ok(public_key) => public_key,
            Err(KeyStoreError::AlreadyExists {
                public_key, ..
            }) => {
                self.audit.record(&StepAuditEvent::named_key_reused(index, &step.method, name));
                public_key
            }
            Err(err) => return Err(err.into()),
        };
        let address = Address::from_ed25519(&public_key);
        response.set_message(format!("created named key with address {address}"));
        Ok(())
    }

    /// Loads the program module named by the first parameter.
    fn create_program(
        &self,
        store: &mut dyn StateStore,
        index: usize,
        step: &ResolvedStep,
        response: &mut Response,
    ) -> Result<(), StepError> {
        let param = first_param(index, step)?;
        let path = param.as_text().ok_or_else(|| {
            StepError::PathNotFound(String::from_utf8_lossy(&param.value).into_owned())
        })?;
        let program_id = self.loader.create(store, Path::new(path))?;
        response.set_generated_id(program_id);
        Ok(())
    }

    /// Calls a program method and fills the response.
    fn call(
        &self,
        store: &mut dyn StateStore,
        index: usize,
        step: &ResolvedStep,
        response: &mut Response,
    ) -> Result<(), StepError> {
        let param = first_param(index, step)?;
        let program_id = ProgramId::from_slice(&param.value).ok_or_else(|| {
            StepError::InvalidIdentifier(format!(
                "expected {PROGRAM_ID_LEN} bytes, got {}",
                param.value.len()
            ))
        })?;
        let invocation = Invocation {
            program_id,
            method: &step.method,
            params: &step.params[1 ..],
            max_units: step.unit_budget(),
            caller: step.caller,
        };
        let outcome = self.interpreter.invoke(store, &invocation)?;
        if outcome.results.len() > 1 {
            return Err(StepError::MultiResponseUnsupported(outcome.results.len()));
        }
        if let Some(Some(payload)) = outcome.results.into_iter().next() {
            response.set_payload(payload);
        }
        if step.endpoint == Endpoint::Execute {
            response.set_generated_id(outcome.call_id);
            response.set_balance(outcome.balance);
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the first parameter of a resolved step.
fn first_param(index: usize, step: &ResolvedStep) -> Result<&Parameter, StepError> {
    step.params.first().ok_or_else(|| StepError::InvalidStep {
        step: index,
        reason: "no params found".to_string(),
    })
}
