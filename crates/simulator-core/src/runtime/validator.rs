// crates/simulator-core/src/runtime/validator.rs
// ============================================================================
// Module: Simulator Step Validator
// Description: Shape and first-parameter checks for wire steps.
// Purpose: Reject malformed steps before any state is touched.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! [`StepValidator::verify`] turns a [`StepSpec`] into a typed [`Step`]. It is
//! pure: no store, key, or ledger access. Checks run in a fixed order:
//!
//! 1. the step has at least one parameter,
//! 2. the endpoint is known,
//! 3. the first parameter satisfies the endpoint contract,
//! 4. every remaining parameter type is known.
//!
//! | Endpoint | First parameter | Qualifier |
//! |---|---|---|
//! | `key` | `ed25519` or `secp256k1` | none |
//! | `readonly` | `id` | [`ParamRequirement::FirstParamRequiredId`] |
//! | `execute` + [`PROGRAM_CREATE_METHOD`] | `string` | [`ParamRequirement::FirstParamRequiredString`] |
//! | `execute` otherwise | `id` | [`ParamRequirement::FirstParamRequiredId`] |

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Endpoint;
use crate::core::PROGRAM_CREATE_METHOD;
use crate::core::ParamRequirement;
use crate::core::ParamType;
use crate::core::Parameter;
use crate::core::Step;
use crate::core::StepError;
use crate::core::StepSpec;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Stateless step validator.
#[derive(Debug, Default, Clone, Copy)]
pub struct StepValidator;

impl StepValidator {
    /// Validates step `index` and returns its typed form.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidStep`] when the step has no parameters,
    /// [`StepError::InvalidEndpoint`] for unknown endpoints, and
    /// [`StepError::InvalidParamType`] for unknown or misplaced parameter
    /// types.
    pub fn verify(index: usize, spec: &StepSpec) -> Result<Step, StepError> {
        let Some(first) = spec.params.first() else {
            return Err(StepError::InvalidStep {
                step: index,
                reason: "no params found".to_string(),
            });
        };
        let endpoint = Endpoint::parse(&spec.endpoint)
            .ok_or_else(|| StepError::InvalidEndpoint(spec.endpoint.clone()))?;

        let first_type = ParamType::parse(&first.param_type);
        let contract = first_param_contract(endpoint, &spec.method);
        if !first_type.is_some_and(|param_type| contract.accepts(param_type)) {
            return Err(StepError::InvalidParamType {
                step: index,
                found: first.param_type.clone(),
                requirement: contract.requirement,
            });
        }

        let params = spec
            .params
            .iter()
            .map(|param| {
                ParamType::parse(&param.param_type)
                    .map(|param_type| Parameter::new(param_type, param.value.clone()))
                    .ok_or_else(|| StepError::InvalidParamType {
                        step: index,
                        found: param.param_type.clone(),
                        requirement: None,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Step {
            endpoint,
            method: spec.method.clone(),
            max_units: spec.max_units,
            caller_key: spec.caller_key.clone().filter(|name| !name.is_empty()),
            params,
        })
    }
}

// ============================================================================
// SECTION: Contracts
// ============================================================================

/// Accepted first-parameter types for one endpoint and method.
struct FirstParamContract {
    /// Accepted types.
    accepted: &'static [ParamType],
    /// Qualifier reported on violation.
    requirement: Option<ParamRequirement>,
}

impl FirstParamContract {
    /// Returns true when `param_type` satisfies the contract.
    fn accepts(&self, param_type: ParamType) -> bool {
        self.accepted.contains(&param_type)
    }
}

/// Returns the first-parameter contract for an endpoint and method.
fn first_param_contract(endpoint: Endpoint, method: &str) -> FirstParamContract {
    match endpoint {
        Endpoint::Key => FirstParamContract {
            accepted: &[ParamType::KeyEd25519, ParamType::KeySecp256k1],
            requirement: None,
        },
        Endpoint::Execute if method == PROGRAM_CREATE_METHOD => FirstParamContract {
            accepted: &[ParamType::String],
            requirement: Some(ParamRequirement::FirstParamRequiredString),
        },
        Endpoint::Execute | Endpoint::ReadOnly => FirstParamContract {
            accepted: &[ParamType::Id],
            requirement: Some(ParamRequirement::FirstParamRequiredId),
        },
    }
}
