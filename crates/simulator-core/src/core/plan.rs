// crates/simulator-core/src/core/plan.rs
// ============================================================================
// Module: Simulator Plan Builder
// Description: Typed construction and parsing of multi-step plans.
// Purpose: Let hosts author plans in Rust or load them from JSON documents.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Plan`] is an ordered list of [`StepSpec`] values plus an optional
//! caller key applied to every step that does not name its own. Adding a step
//! returns a [`StepRef`] that later steps pass as a [`Param::Id`]; it is
//! written to the wire as the symbolic reference `step_N`.
//!
//! Plan documents are accepted in three shapes: a single step object, an
//! array of steps, or `{ "callerKey": ..., "steps": [...] }`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::error::StepError;
use crate::core::identifiers::StepRef;
use crate::core::step::Endpoint;
use crate::core::step::KEY_CREATE_METHOD;
use crate::core::step::PROGRAM_CREATE_METHOD;
use crate::core::step::ParamType;
use crate::core::step::ParameterSpec;
use crate::core::step::PlanSource;
use crate::core::step::StepSpec;

// ============================================================================
// SECTION: Typed Parameters
// ============================================================================

/// Named key together with its algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpec {
    /// Ed25519 key name.
    Ed25519(String),
    /// Secp256k1 key name.
    Secp256k1(String),
}

/// Typed step argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Unsigned integer, encoded little-endian.
    U64(u64),
    /// Boolean, encoded as a single byte.
    Bool(bool),
    /// UTF-8 text.
    String(String),
    /// Reference to the identifier produced by an earlier step.
    Id(StepRef),
    /// Named key.
    Key(KeySpec),
}

impl From<Param> for ParameterSpec {
    fn from(param: Param) -> Self {
        match param {
            Param::U64(value) => Self::new(ParamType::Uint64, value.to_le_bytes()),
            Param::Bool(value) => Self::new(ParamType::Bool, [u8::from(value)]),
            Param::String(text) => Self::new(ParamType::String, text),
            Param::Id(step) => Self::new(ParamType::Id, step.to_string()),
            Param::Key(KeySpec::Ed25519(name)) => Self::new(ParamType::KeyEd25519, name),
            Param::Key(KeySpec::Secp256k1(name)) => Self::new(ParamType::KeySecp256k1, name),
        }
    }
}

impl From<u64> for Param {
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<StepRef> for Param {
    fn from(value: StepRef) -> Self {
        Self::Id(value)
    }
}

impl From<KeySpec> for Param {
    fn from(value: KeySpec) -> Self {
        Self::Key(value)
    }
}

// ============================================================================
// SECTION: Step Constructors
// ============================================================================

impl StepSpec {
    /// Builds a step that creates (or reuses) a named key.
    #[must_use]
    pub fn create_key(key: KeySpec) -> Self {
        Self {
            endpoint: Endpoint::Key.as_str().to_string(),
            method: KEY_CREATE_METHOD.to_string(),
            max_units: 0,
            caller_key: None,
            params: vec![Param::Key(key).into()],
        }
    }

    /// Builds a step that creates a program from the module at `path`.
    #[must_use]
    pub fn create_program(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_string_lossy().into_owned();
        Self {
            endpoint: Endpoint::Execute.as_str().to_string(),
            method: PROGRAM_CREATE_METHOD.to_string(),
            max_units: 0,
            caller_key: None,
            params: vec![Param::String(path).into()],
        }
    }

    /// Builds a state-changing call to `method` on the program created by
    /// the `program` step.
    #[must_use]
    pub fn execute(
        program: StepRef,
        method: impl Into<String>,
        max_units: u64,
        args: impl IntoIterator<Item = Param>,
    ) -> Self {
        Self::call(Endpoint::Execute, program, method.into(), max_units, args)
    }

    /// Builds a read-only call to `method` on the program created by the
    /// `program` step.
    #[must_use]
    pub fn read_only(
        program: StepRef,
        method: impl Into<String>,
        args: impl IntoIterator<Item = Param>,
    ) -> Self {
        Self::call(Endpoint::ReadOnly, program, method.into(), 0, args)
    }

    /// Sets the caller key of the step.
    #[must_use]
    pub fn with_caller_key(mut self, caller_key: impl Into<String>) -> Self {
        self.caller_key = Some(caller_key.into());
        self
    }

    /// Builds a program call with the program reference as first parameter.
    fn call(
        endpoint: Endpoint,
        program: StepRef,
        method: String,
        max_units: u64,
        args: impl IntoIterator<Item = Param>,
    ) -> Self {
        let params = std::iter::once(Param::Id(program))
            .chain(args)
            .map(ParameterSpec::from)
            .collect();
        Self {
            endpoint: endpoint.as_str().to_string(),
            method,
            max_units,
            caller_key: None,
            params,
        }
    }
}

// ============================================================================
// SECTION: Plan
// ============================================================================

/// Ordered list of steps sharing an optional caller key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Caller key applied to steps that do not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_key: Option<String>,
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

impl Plan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new(caller_key: Option<String>) -> Self {
        Self {
            caller_key,
            steps: Vec::new(),
        }
    }

    /// Appends a step and returns a reference to it.
    pub fn add_step(&mut self, step: StepSpec) -> StepRef {
        self.steps.push(step);
        StepRef::new(self.steps.len() - 1)
    }

    /// Returns the number of steps.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true when the plan has no steps.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the steps with the plan caller key applied where missing.
    #[must_use]
    pub fn into_steps(self) -> Vec<StepSpec> {
        let caller_key = self.caller_key;
        self.steps
            .into_iter()
            .map(|mut step| {
                if step.caller_key.is_none() {
                    step.caller_key.clone_from(&caller_key);
                }
                step
            })
            .collect()
    }

    /// Parses a plan document.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MalformedPlan`] when the payload is not a step,
    /// an array of steps, or a plan object.
    pub fn from_json(bytes: &[u8]) -> Result<Self, StepError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|err| StepError::MalformedPlan(err.to_string()))?;
        let parsed = match value {
            Value::Array(_) => serde_json::from_value(value).map(|steps| Self {
                caller_key: None,
                steps,
            }),
            Value::Object(ref fields) if fields.contains_key("steps") => {
                serde_json::from_value(value)
            }
            _ => serde_json::from_value(value).map(|step| Self {
                caller_key: None,
                steps: vec![step],
            }),
        };
        parsed.map_err(|err| StepError::MalformedPlan(err.to_string()))
    }

    /// Reads and parses a plan document from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MalformedPlan`] when reading or parsing fails.
    pub fn load(source: &PlanSource, max_bytes: usize) -> Result<Self, StepError> {
        Self::from_json(&source.read(max_bytes)?)
    }
}
