// crates/simulator-core/src/runtime/resolver.rs
// ============================================================================
// Module: Simulator Parameter Resolver
// Description: Rewrites validated step parameters into engine-ready values.
// Purpose: Substitute step references and named keys before dispatch.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Resolution preserves parameter order and count. Per parameter type:
//!
//! - `string` / `id`: `step_N` is replaced by the identifier recorded at
//!   ledger index `N`. 32 raw bytes pass through unchanged. An `id` in its
//!   64-character hex form is normalized to raw bytes; a `string` never is.
//!   Anything else is treated as a filesystem path that must exist and is
//!   passed through unchanged.
//! - `ed25519`: the named key is replaced by its derived [`Address`]. An
//!   unknown name is only acceptable on the key endpoint, where it is about to
//!   be created. The key endpoint's first parameter always keeps its name so
//!   that re-creating an existing key is idempotent.
//! - `secp256k1`: declared but unsupported.
//! - `u64` / `bool`: passed through unchanged.
//!
//! Resolution only reads state; it never mutates the store or the ledger.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use crate::core::Address;
use crate::core::Endpoint;
use crate::core::PROGRAM_CREATE_METHOD;
use crate::core::ParamType;
use crate::core::Parameter;
use crate::core::ProgramId;
use crate::core::STEP_REFERENCE_PREFIX;
use crate::core::Step;
use crate::core::StepError;
use crate::interfaces::KeyStore;
use crate::interfaces::StateStore;
use crate::runtime::ledger::RunLedger;

// ============================================================================
// SECTION: Resolved Step
// ============================================================================

/// A validated step whose parameters are ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStep {
    /// Endpoint to call.
    pub endpoint: Endpoint,
    /// Method name.
    pub method: String,
    /// Unit budget.
    pub max_units: u64,
    /// Resolved parameters, same order and count as the step.
    pub params: Vec<Parameter>,
    /// Address of the caller key, for program calls that name one.
    pub caller: Option<Address>,
}

impl ResolvedStep {
    /// Returns true when the step creates a program.
    #[must_use]
    pub fn is_program_create(&self) -> bool {
        self.endpoint == Endpoint::Execute && self.method == PROGRAM_CREATE_METHOD
    }

    /// Returns the unit budget handed to the interpreter.
    ///
    /// Read-only calls are never charged, so their budget is unlimited
    /// regardless of `max_units`.
    #[must_use]
    pub const fn unit_budget(&self) -> u64 {
        match self.endpoint {
            Endpoint::ReadOnly => u64::MAX,
            Endpoint::Key | Endpoint::Execute => self.max_units,
        }
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves step parameters against the run ledger and the key store.
pub struct ParameterResolver<'a, K: KeyStore + ?Sized> {
    /// Identifiers recorded by earlier steps.
    ledger: &'a RunLedger,
    /// Named key lookups.
    keys: &'a K,
}

impl<'a, K: KeyStore + ?Sized> ParameterResolver<'a, K> {
    /// Creates a resolver over the given ledger and key store.
    #[must_use]
    pub const fn new(ledger: &'a RunLedger, keys: &'a K) -> Self {
        Self {
            ledger,
            keys,
        }
    }

    /// Resolves every parameter of `step`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::UnresolvedStepReference`],
    /// [`StepError::PathNotFound`], [`StepError::NamedKeyNotFound`],
    /// [`StepError::Unsupported`], or a key store error.
    pub fn resolve(&self, store: &dyn StateStore, step: &Step) -> Result<ResolvedStep, StepError> {
        let params = step
            .params
            .iter()
            .enumerate()
            .map(|(position, param)| self.resolve_param(store, step.endpoint, position, param))
            .collect::<Result<Vec<_>, _>>()?;

        let caller = match (step.endpoint, step.caller_key.as_deref()) {
            (Endpoint::Execute | Endpoint::ReadOnly, Some(name)) => {
                let address = self.named_address(store, name)?;
                Some(address.ok_or_else(|| StepError::NamedKeyNotFound(name.to_string()))?)
            }
            _ => None,
        };

        Ok(ResolvedStep {
            endpoint: step.endpoint,
            method: step.method.clone(),
            max_units: step.max_units,
            params,
            caller,
        })
    }

    /// Resolves one parameter.
    fn resolve_param(
        &self,
        store: &dyn StateStore,
        endpoint: Endpoint,
        position: usize,
        param: &Parameter,
    ) -> Result<Parameter, StepError> {
        match param.param_type {
            ParamType::String | ParamType::Id => self.resolve_reference(param),
            ParamType::KeyEd25519 => {
                let name = key_name(param)?;
                if endpoint == Endpoint::Key && position == 0 {
                    return Ok(param.clone());
                }
                match self.named_address(store, name)? {
                    Some(address) => {
                        Ok(Parameter::new(param.param_type, address.as_bytes().to_vec()))
                    }
                    None if endpoint == Endpoint::Key => Ok(param.clone()),
                    None => Err(StepError::NamedKeyNotFound(name.to_string())),
                }
            }
            ParamType::KeySecp256k1 => {
                Err(StepError::Unsupported("secp256k1 named keys are not supported".to_string()))
            }
            ParamType::Uint64 | ParamType::Bool => Ok(param.clone()),
        }
    }

    /// Resolves a string or id parameter.
    fn resolve_reference(&self, param: &Parameter) -> Result<Parameter, StepError> {
        let text = param.as_text();
        if let Some(reference) = text.filter(|text| text.starts_with(STEP_REFERENCE_PREFIX)) {
            let id = reference[STEP_REFERENCE_PREFIX.len() ..]
                .parse::<usize>()
                .ok()
                .and_then(|index| self.ledger.get(index))
                .ok_or_else(|| StepError::UnresolvedStepReference {
                    reference: reference.to_string(),
                })?;
            return Ok(Parameter::new(param.param_type, id.as_bytes().to_vec()));
        }
        if param.param_type == ParamType::Id
            && let Some(id) = ProgramId::from_param_value(&param.value)
        {
            return Ok(Parameter::new(param.param_type, id.as_bytes().to_vec()));
        }
        if ProgramId::from_slice(&param.value).is_some() {
            return Ok(param.clone());
        }
        match text {
            Some(path) if !matches!(Path::new(path).try_exists(), Ok(false)) => Ok(param.clone()),
            Some(path) => Err(StepError::PathNotFound(path.to_string())),
            None => {
                Err(StepError::PathNotFound(String::from_utf8_lossy(&param.value).into_owned()))
            }
        }
    }

    /// Returns the address of the named key, if it exists.
    fn named_address(
        &self,
        store: &dyn StateStore,
        name: &str,
    ) -> Result<Option<Address>, StepError> {
        Ok(self.keys.public_key(store, name)?.map(|key| Address::from_ed25519(&key)))
    }
}

/// Returns a key parameter's name.
fn key_name(param: &Parameter) -> Result<&str, StepError> {
    param.as_text().ok_or_else(|| {
        StepError::NamedKeyNotFound(String::from_utf8_lossy(&param.value).into_owned())
    })
}
