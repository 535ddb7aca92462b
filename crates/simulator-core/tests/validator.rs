// crates/simulator-core/tests/validator.rs
// ============================================================================
// Module: Step Validator Tests
// Description: Shape, endpoint, and first-parameter contract checks.
// Purpose: Ensure malformed steps are rejected before any resolution.
// ============================================================================

//! Step validator tests, including property checks over arbitrary inputs.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use simulator_core::Endpoint;
use simulator_core::PROGRAM_CREATE_METHOD;
use simulator_core::ParamRequirement;
use simulator_core::ParamType;
use simulator_core::ParameterSpec;
use simulator_core::StepError;
use simulator_core::StepErrorKind;
use simulator_core::StepSpec;
use simulator_core::StepValidator;

fn spec(endpoint: &str, method: &str, params: Vec<ParameterSpec>) -> StepSpec {
    StepSpec {
        endpoint: endpoint.to_string(),
        method: method.to_string(),
        max_units: 10,
        caller_key: None,
        params,
    }
}

fn param(label: &str, value: &[u8]) -> ParameterSpec {
    ParameterSpec {
        param_type: label.to_string(),
        value: value.to_vec(),
    }
}

const TYPE_LABELS: [&str; 6] = ["string", "id", "ed25519", "secp256k1", "u64", "bool"];

// ============================================================================
// SECTION: Contracts
// ============================================================================

#[test]
fn key_endpoint_accepts_both_key_kinds() {
    for label in ["ed25519", "secp256k1"] {
        let step = StepValidator::verify(0, &spec("key", "create_key", vec![param(label, b"alice")]))
            .unwrap();
        assert_eq!(step.endpoint, Endpoint::Key);
        assert!(step.params[0].param_type.is_key());
    }
}

#[test]
fn key_endpoint_rejects_non_key_first_param_without_qualifier() {
    let err = StepValidator::verify(3, &spec("key", "create_key", vec![param("string", b"alice")]))
        .unwrap_err();
    assert_eq!(err.kind(), StepErrorKind::InvalidParamType);
    assert_eq!(err.requirement(), None);
    assert!(err.to_string().contains("invalid step 3"));
}

#[test]
fn readonly_requires_id_first() {
    let err = StepValidator::verify(0, &spec("readonly", "get", vec![param("string", b"x")]))
        .unwrap_err();
    assert_eq!(err.kind(), StepErrorKind::InvalidParamType);
    assert_eq!(err.requirement(), Some(ParamRequirement::FirstParamRequiredId));
}

#[test]
fn execute_call_requires_id_first() {
    let err =
        StepValidator::verify(0, &spec("execute", "inc", vec![param("u64", &[1, 0, 0, 0, 0, 0, 0, 0])]))
            .unwrap_err();
    assert_eq!(err.requirement(), Some(ParamRequirement::FirstParamRequiredId));
}

#[test]
fn program_create_requires_string_first() {
    let err = StepValidator::verify(0, &spec("execute", PROGRAM_CREATE_METHOD, vec![param("id", b"step_0")]))
        .unwrap_err();
    assert_eq!(err.kind(), StepErrorKind::InvalidParamType);
    assert_eq!(err.requirement(), Some(ParamRequirement::FirstParamRequiredString));

    let step = StepValidator::verify(
        0,
        &spec("execute", PROGRAM_CREATE_METHOD, vec![param("string", b"./mod.wasm")]),
    )
    .unwrap();
    assert!(step.is_program_create());
}

#[test]
fn unknown_endpoint_is_invalid_endpoint() {
    let err = StepValidator::verify(0, &spec("bogus", "x", vec![param("id", b"step_0")])).unwrap_err();
    assert!(matches!(err, StepError::InvalidEndpoint(ref endpoint) if endpoint == "bogus"));
}

#[test]
fn empty_params_checked_before_endpoint() {
    let err = StepValidator::verify(0, &spec("bogus", "x", Vec::new())).unwrap_err();
    assert_eq!(err.kind(), StepErrorKind::InvalidStep);
}

#[test]
fn unknown_trailing_param_type_is_rejected() {
    let err = StepValidator::verify(
        1,
        &spec("execute", "inc", vec![param("id", b"step_0"), param("u128", b"1")]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        StepError::InvalidParamType { step: 1, ref found, requirement: None } if found == "u128"
    ));
}

#[test]
fn verified_step_keeps_order_budget_and_caller() {
    let mut raw = spec("execute", "transfer", vec![param("id", b"step_1"), param("bool", &[1])]);
    raw.caller_key = Some("alice".to_string());
    let step = StepValidator::verify(2, &raw).unwrap();
    assert_eq!(step.max_units, 10);
    assert_eq!(step.caller_key.as_deref(), Some("alice"));
    assert_eq!(
        step.params.iter().map(|param| param.param_type).collect::<Vec<_>>(),
        vec![ParamType::Id, ParamType::Bool]
    );
}

#[test]
fn empty_caller_key_is_ignored() {
    let mut raw = spec("execute", "transfer", vec![param("id", b"step_1")]);
    raw.caller_key = Some(String::new());
    assert_eq!(StepValidator::verify(0, &raw).unwrap().caller_key, None);
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn empty_params_always_invalid_step(endpoint in ".{0,12}", method in ".{0,12}", index in 0usize .. 1000) {
        let err = StepValidator::verify(index, &spec(&endpoint, &method, Vec::new())).unwrap_err();
        prop_assert_eq!(err.kind(), StepErrorKind::InvalidStep);
    }

    #[test]
    fn program_create_non_string_first_param_rejected(
        label in prop::sample::select(TYPE_LABELS.to_vec()),
        value in prop::collection::vec(any::<u8>(), 0 .. 16),
    ) {
        let result = StepValidator::verify(0, &spec("execute", PROGRAM_CREATE_METHOD, vec![param(label, &value)]));
        if label == "string" {
            prop_assert!(result.is_ok());
        } else {
            let err = result.unwrap_err();
            prop_assert_eq!(err.kind(), StepErrorKind::InvalidParamType);
            prop_assert_eq!(err.requirement(), Some(ParamRequirement::FirstParamRequiredString));
        }
    }

    #[test]
    fn unknown_endpoints_never_validate(endpoint in "[a-z]{1,10}") {
        prop_assume!(Endpoint::parse(&endpoint).is_none());
        let err = StepValidator::verify(0, &spec(&endpoint, "m", vec![param("id", b"step_0")])).unwrap_err();
        prop_assert_eq!(err.kind(), StepErrorKind::InvalidEndpoint);
    }
}
