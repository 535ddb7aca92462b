// crates/simulator-core/src/core/step.rs
// ============================================================================
// Module: Simulator Step Model
// Description: Wire and typed representations of one plan step.
// Purpose: Deserialize declarative steps from inline text or files.
// Dependencies: base64, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`StepSpec`] is the wire shape of a step exactly as written in a plan:
//! the endpoint and parameter types are free text so that unknown values can
//! be rejected by the validator with a precise error. A validated [`Step`]
//! carries the closed [`Endpoint`] and [`ParamType`] enums instead.
//!
//! Parameter values are opaque bytes, serialized as standard base64.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::StepError;
use crate::core::read::ReadLimitError;
use crate::core::read::read_bytes_with_limit;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Method name on the execute endpoint that creates a program instead of
/// calling one. Its first parameter is a module path rather than a program id.
pub const PROGRAM_CREATE_METHOD: &str = "program_create";
/// Method name used by key-creation steps built with [`StepSpec::create_key`].
pub const KEY_CREATE_METHOD: &str = "create_key";
/// Default maximum size of a plan payload in bytes.
pub const DEFAULT_MAX_PLAN_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Endpoints and Parameter Types
// ============================================================================

/// Category of operation a step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Create or fetch a named key.
    Key,
    /// Create a program, or call a possibly state-changing program method.
    Execute,
    /// Call a program method without charging units.
    ReadOnly,
}

impl Endpoint {
    /// Returns the wire label of the endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Execute => "execute",
            Self::ReadOnly => "readonly",
        }
    }

    /// Parses a wire label; returns `None` for unknown endpoints.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "key" => Some(Self::Key),
            "execute" => Some(Self::Execute),
            "readonly" => Some(Self::ReadOnly),
            _ => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type tag of a step parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    /// UTF-8 text, a `step_N` reference, or a filesystem path.
    #[serde(rename = "string")]
    String,
    /// Program identifier or `step_N` reference.
    #[serde(rename = "id")]
    Id,
    /// Named Ed25519 key.
    #[serde(rename = "ed25519")]
    KeyEd25519,
    /// Named secp256k1 key (declared, not supported).
    #[serde(rename = "secp256k1")]
    KeySecp256k1,
    /// Little-endian unsigned 64-bit integer.
    #[serde(rename = "u64")]
    Uint64,
    /// Boolean.
    #[serde(rename = "bool")]
    Bool,
}

impl ParamType {
    /// Returns the wire label of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Id => "id",
            Self::KeyEd25519 => "ed25519",
            Self::KeySecp256k1 => "secp256k1",
            Self::Uint64 => "u64",
            Self::Bool => "bool",
        }
    }

    /// Parses a wire label; returns `None` for unknown types.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "string" => Some(Self::String),
            "id" => Some(Self::Id),
            "ed25519" => Some(Self::KeyEd25519),
            "secp256k1" => Some(Self::KeySecp256k1),
            "u64" => Some(Self::Uint64),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    /// Returns true for named-key types.
    #[must_use]
    pub const fn is_key(self) -> bool {
        matches!(self, Self::KeyEd25519 | Self::KeySecp256k1)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Wire Shape
// ============================================================================

/// A step exactly as written in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSpec {
    /// Endpoint label.
    pub endpoint: String,
    /// Method name.
    pub method: String,
    /// Unit budget for execute calls.
    #[serde(default)]
    pub max_units: u64,
    /// Optional named key of the calling actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_key: Option<String>,
    /// Ordered parameters.
    #[serde(default)]
    pub params: Vec<ParameterSpec>,
}

impl StepSpec {
    /// Parses a step from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MalformedPlan`] when the payload is not a step.
    pub fn from_json(bytes: &[u8]) -> Result<Self, StepError> {
        serde_json::from_slice(bytes).map_err(|err| StepError::MalformedPlan(err.to_string()))
    }
}

/// A parameter exactly as written in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter type label.
    #[serde(rename = "type")]
    pub param_type: String,
    /// Raw parameter bytes.
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
}

impl ParameterSpec {
    /// Creates a parameter spec from a typed tag and raw bytes.
    #[must_use]
    pub fn new(param_type: ParamType, value: impl Into<Vec<u8>>) -> Self {
        Self {
            param_type: param_type.as_str().to_string(),
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Typed Step
// ============================================================================

/// A typed parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter type.
    pub param_type: ParamType,
    /// Raw parameter bytes.
    pub value: Vec<u8>,
}

impl Parameter {
    /// Creates a typed parameter.
    #[must_use]
    pub fn new(param_type: ParamType, value: impl Into<Vec<u8>>) -> Self {
        Self {
            param_type,
            value: value.into(),
        }
    }

    /// Returns the value as UTF-8 text, if it is valid UTF-8.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }
}

/// A validated step.
///
/// # Invariants
/// - `params` is non-empty.
/// - `params[0].param_type` satisfies the endpoint contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Endpoint to call.
    pub endpoint: Endpoint,
    /// Method name.
    pub method: String,
    /// Unit budget for execute calls.
    pub max_units: u64,
    /// Optional named key of the calling actor.
    pub caller_key: Option<String>,
    /// Ordered parameters.
    pub params: Vec<Parameter>,
}

impl Step {
    /// Returns true when the step creates a program.
    #[must_use]
    pub fn is_program_create(&self) -> bool {
        self.endpoint == Endpoint::Execute && self.method == PROGRAM_CREATE_METHOD
    }
}

// ============================================================================
// SECTION: Plan Source
// ============================================================================

/// Where a single step is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    /// Inline JSON text.
    Inline(String),
    /// Path to a JSON file.
    File(PathBuf),
}

impl PlanSource {
    /// Selects the plan source from optional inline text and file path.
    ///
    /// Empty values count as absent. Exactly one source must remain.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MalformedPlan`] when zero or two sources are given.
    pub fn from_options(inline: Option<String>, file: Option<PathBuf>) -> Result<Self, StepError> {
        let inline = inline.filter(|text| !text.trim().is_empty());
        let file = file.filter(|path| !path.as_os_str().is_empty());
        match (inline, file) {
            (Some(text), None) => Ok(Self::Inline(text)),
            (None, Some(path)) => Ok(Self::File(path)),
            (None, None) => Err(StepError::MalformedPlan(
                "please specify either a --step or a --file flag".to_string(),
            )),
            (Some(_), Some(_)) => Err(StepError::MalformedPlan(
                "--step and --file are mutually exclusive".to_string(),
            )),
        }
    }

    /// Reads the raw plan payload.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MalformedPlan`] when the payload cannot be read or
    /// exceeds `max_bytes`.
    pub fn read(&self, max_bytes: usize) -> Result<Vec<u8>, StepError> {
        match self {
            Self::Inline(text) => {
                if text.len() > max_bytes {
                    return Err(StepError::MalformedPlan(format!(
                        "inline step is {} bytes (limit {max_bytes})",
                        text.len()
                    )));
                }
                Ok(text.as_bytes().to_vec())
            }
            Self::File(path) => read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
                ReadLimitError::Io(err) => {
                    StepError::MalformedPlan(format!("{}: {err}", path.display()))
                }
                ReadLimitError::TooLarge {
                    size,
                    limit,
                } => StepError::MalformedPlan(format!(
                    "{} is {size} bytes (limit {limit})",
                    path.display()
                )),
            }),
        }
    }

    /// Reads and parses a single step.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MalformedPlan`] when reading or parsing fails.
    pub fn load(&self, max_bytes: usize) -> Result<StepSpec, StepError> {
        StepSpec::from_json(&self.read(max_bytes)?)
    }
}

// ============================================================================
// SECTION: Base64 Serde
// ============================================================================

/// Serde adapter for byte values encoded as standard base64 strings.
pub(crate) mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    /// Serializes bytes as a base64 string.
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    /// Deserializes bytes from a base64 string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text.as_bytes()).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional byte values encoded as base64 strings.
pub(crate) mod base64_option {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    /// Serializes optional bytes as a base64 string or null.
    #[allow(
        clippy::ref_option,
        reason = "Serde `with` adapters receive a reference to the field type."
    )]
    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes optional bytes from a base64 string or null.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| STANDARD.decode(text.as_bytes()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
