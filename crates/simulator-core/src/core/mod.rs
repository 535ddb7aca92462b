// crates/simulator-core/src/core/mod.rs
// ============================================================================
// Module: Simulator Core Types
// Description: Step model, identifiers, responses, errors, and plan builder.
// Purpose: Provide the serializable types shared by every plan front end.
// Dependencies: base64, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what a plan step is, what it produces, and how it can
//! fail. They carry no behavior beyond parsing and formatting; validation,
//! resolution, and dispatch live in [`crate::runtime`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod error;
pub mod identifiers;
pub mod plan;
pub mod read;
pub mod response;
pub mod step;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::ParamRequirement;
pub use error::StepError;
pub use error::StepErrorKind;
pub use identifiers::ADDRESS_LEN;
pub use identifiers::Address;
pub use identifiers::ED25519_ADDRESS_PREFIX;
pub use identifiers::IdentifierError;
pub use identifiers::PROGRAM_ID_LEN;
pub use identifiers::PUBLIC_KEY_LEN;
pub use identifiers::ProgramId;
pub use identifiers::PublicKey;
pub use identifiers::STEP_REFERENCE_PREFIX;
pub use identifiers::StepRef;
pub use plan::KeySpec;
pub use plan::Param;
pub use plan::Plan;
pub use read::ReadLimitError;
pub use read::read_bytes_with_limit;
pub use response::Response;
pub use response::ResponseError;
pub use response::StepResult;
pub use step::DEFAULT_MAX_PLAN_BYTES;
pub use step::Endpoint;
pub use step::KEY_CREATE_METHOD;
pub use step::PROGRAM_CREATE_METHOD;
pub use step::ParamType;
pub use step::Parameter;
pub use step::ParameterSpec;
pub use step::PlanSource;
pub use step::Step;
pub use step::StepSpec;
