// crates/simulator-core/src/core/error.rs
// ============================================================================
// Module: Simulator Step Errors
// Description: Structured error taxonomy for plan step execution.
// Purpose: Let callers match on an error kind plus optional qualifier.
// Dependencies: crate::interfaces, serde, thiserror
// ============================================================================

//! ## Overview
//! Every failure of a step maps to one [`StepError`]. The coarse category is
//! available through [`StepError::kind`], and parameter-type failures carry a
//! [`ParamRequirement`] naming the contract the first parameter broke.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::interfaces::InterpreterError;
use crate::interfaces::KeyStoreError;
use crate::interfaces::LoaderError;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Kinds
// ============================================================================

/// Coarse category of a step error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepErrorKind {
    /// No plan source, unreadable source, or unparsable step.
    MalformedPlan,
    /// Step shape is invalid (for example, no parameters).
    InvalidStep,
    /// Endpoint is not one of the supported endpoints.
    InvalidEndpoint,
    /// Parameter type is unknown or violates the endpoint contract.
    InvalidParamType,
    /// A `step_N` reference has no recorded identifier.
    UnresolvedStepReference,
    /// A path parameter does not exist.
    PathNotFound,
    /// A named key is not present in the key store.
    NamedKeyNotFound,
    /// The interpreter returned more than one result payload.
    MultiResponseUnsupported,
    /// The requested feature is declared but not implemented.
    Unsupported,
    /// A program identifier parameter is malformed.
    InvalidIdentifier,
    /// State store failure.
    Store,
    /// Key store failure.
    KeyStore,
    /// Program loader failure.
    Loader,
    /// Program interpreter failure.
    Interpreter,
}

impl StepErrorKind {
    /// Returns the stable snake-case label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedPlan => "malformed_plan",
            Self::InvalidStep => "invalid_step",
            Self::InvalidEndpoint => "invalid_endpoint",
            Self::InvalidParamType => "invalid_param_type",
            Self::UnresolvedStepReference => "unresolved_step_reference",
            Self::PathNotFound => "path_not_found",
            Self::NamedKeyNotFound => "named_key_not_found",
            Self::MultiResponseUnsupported => "multi_response_unsupported",
            Self::Unsupported => "unsupported",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::Store => "store",
            Self::KeyStore => "key_store",
            Self::Loader => "loader",
            Self::Interpreter => "interpreter",
        }
    }
}

impl fmt::Display for StepErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualifier for [`StepError::InvalidParamType`] naming the broken contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRequirement {
    /// The first parameter must be a program identifier.
    FirstParamRequiredId,
    /// The first parameter must be a string.
    FirstParamRequiredString,
}

impl fmt::Display for ParamRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstParamRequiredId => f.write_str("first param required to be an id"),
            Self::FirstParamRequiredString => f.write_str("first param required to be a string"),
        }
    }
}

// ============================================================================
// SECTION: Step Error
// ============================================================================

/// Errors raised while loading, validating, resolving, or dispatching a step.
#[derive(Debug, Error)]
pub enum StepError {
    /// No plan source, unreadable source, or unparsable step.
    #[error("malformed plan: {0}")]
    MalformedPlan(String),
    /// Step shape is invalid.
    #[error("invalid step {step}: {reason}")]
    InvalidStep {
        /// Step index.
        step: usize,
        /// Reason the step is invalid.
        reason: String,
    },
    /// Endpoint is not supported.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Parameter type is unknown or violates the endpoint contract.
    #[error("invalid step {step}: invalid param type {found}{}", requirement_suffix(.requirement.as_ref()))]
    InvalidParamType {
        /// Step index.
        step: usize,
        /// Offending parameter type label.
        found: String,
        /// Contract violated by the first parameter, when applicable.
        requirement: Option<ParamRequirement>,
    },
    /// A `step_N` reference has no recorded identifier.
    #[error("failed to map to id: {reference}")]
    UnresolvedStepReference {
        /// Reference text as written in the plan.
        reference: String,
    },
    /// A path parameter does not exist.
    #[error("path does not exist: {0}")]
    PathNotFound(String),
    /// A named key is not present in the key store.
    #[error("named key not found: {0}")]
    NamedKeyNotFound(String),
    /// The interpreter returned more than one result payload.
    #[error("multi response not supported: {0} results returned")]
    MultiResponseUnsupported(usize),
    /// The requested feature is declared but not implemented.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// A program identifier parameter is malformed.
    #[error("invalid program id: {0}")]
    InvalidIdentifier(String),
    /// State store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Key store failure.
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),
    /// Program loader failure.
    #[error(transparent)]
    Loader(#[from] LoaderError),
    /// Program interpreter failure.
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
}

impl StepError {
    /// Returns the coarse category of the error.
    #[must_use]
    pub const fn kind(&self) -> StepErrorKind {
        match self {
            Self::MalformedPlan(_) => StepErrorKind::MalformedPlan,
            Self::InvalidStep {
                ..
            } => StepErrorKind::InvalidStep,
            Self::InvalidEndpoint(_) => StepErrorKind::InvalidEndpoint,
            Self::InvalidParamType {
                ..
            } => StepErrorKind::InvalidParamType,
            Self::UnresolvedStepReference {
                ..
            } => StepErrorKind::UnresolvedStepReference,
            Self::PathNotFound(_) => StepErrorKind::PathNotFound,
            Self::NamedKeyNotFound(_) => StepErrorKind::NamedKeyNotFound,
            Self::MultiResponseUnsupported(_) => StepErrorKind::MultiResponseUnsupported,
            Self::Unsupported(_) => StepErrorKind::Unsupported,
            Self::InvalidIdentifier(_) => StepErrorKind::InvalidIdentifier,
            Self::Store(_) => StepErrorKind::Store,
            Self::KeyStore(_) => StepErrorKind::KeyStore,
            Self::Loader(_) => StepErrorKind::Loader,
            Self::Interpreter(_) => StepErrorKind::Interpreter,
        }
    }

    /// Returns the parameter requirement qualifier, if any.
    #[must_use]
    pub const fn requirement(&self) -> Option<ParamRequirement> {
        match self {
            Self::InvalidParamType {
                requirement, ..
            } => *requirement,
            _ => None,
        }
    }
}

/// Formats the optional requirement qualifier for error display.
fn requirement_suffix(requirement: Option<&ParamRequirement>) -> String {
    requirement.map_or_else(String::new, |requirement| format!(": {requirement}"))
}
