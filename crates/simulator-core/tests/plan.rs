// crates/simulator-core/tests/plan.rs
// ============================================================================
// Module: Plan Builder and Source Tests
// Description: Typed step construction, plan documents, and plan sources.
// ============================================================================

//! Plan builder and plan source tests.

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

use std::path::PathBuf;

use serde_json::json;
use simulator_core::KeySpec;
use simulator_core::Param;
use simulator_core::Plan;
use simulator_core::PlanSource;
use simulator_core::StepErrorKind;
use simulator_core::StepRef;
use simulator_core::StepSpec;

#[test]
fn builder_steps_serialize_to_wire_shape() {
    let mut plan = Plan::new(Some("alice".to_string()));
    let key = plan.add_step(StepSpec::create_key(KeySpec::Ed25519("alice".to_string())));
    let program = plan.add_step(StepSpec::create_program("./counter.wasm"));
    plan.add_step(StepSpec::execute(program, "inc", 1_000, [Param::U64(1), Param::Bool(true)]));
    assert_eq!(key, StepRef::new(0));
    assert_eq!(program.to_string(), "step_1");

    let value = serde_json::to_value(&plan).unwrap();
    assert_eq!(
        value,
        json!({
            "callerKey": "alice",
            "steps": [
                {
                    "endpoint": "key",
                    "method": "create_key",
                    "maxUnits": 0,
                    "params": [{ "type": "ed25519", "value": "YWxpY2U=" }]
                },
                {
                    "endpoint": "execute",
                    "method": "program_create",
                    "maxUnits": 0,
                    "params": [{ "type": "string", "value": "Li9jb3VudGVyLndhc20=" }]
                },
                {
                    "endpoint": "execute",
                    "method": "inc",
                    "maxUnits": 1000,
                    "params": [
                        { "type": "id", "value": "c3RlcF8x" },
                        { "type": "u64", "value": "AQAAAAAAAAA=" },
                        { "type": "bool", "value": "AQ==" }
                    ]
                }
            ]
        })
    );
}

#[test]
fn plan_documents_accept_three_shapes() {
    let step = json!({
        "endpoint": "key",
        "method": "create_key",
        "params": [{ "type": "ed25519", "value": "Ym9i" }]
    });

    let single = Plan::from_json(step.to_string().as_bytes()).unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(single.steps[0].max_units, 0);

    let array = Plan::from_json(json!([step, step]).to_string().as_bytes()).unwrap();
    assert_eq!(array.len(), 2);

    let document =
        Plan::from_json(json!({ "callerKey": "bob", "steps": [step] }).to_string().as_bytes())
            .unwrap();
    let steps = document.into_steps();
    assert_eq!(steps[0].caller_key.as_deref(), Some("bob"));
}

#[test]
fn step_caller_key_overrides_plan_caller_key() {
    let mut plan = Plan::new(Some("alice".to_string()));
    plan.add_step(StepSpec::read_only(StepRef::new(0), "get", []).with_caller_key("bob"));
    assert_eq!(plan.into_steps()[0].caller_key.as_deref(), Some("bob"));
}

#[test]
fn invalid_documents_are_malformed_plans() {
    for payload in ["", "42", "{\"endpoint\":\"key\"}", "[{\"method\":1}]", "{\"steps\":3}"] {
        let err = Plan::from_json(payload.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), StepErrorKind::MalformedPlan, "{payload}");
    }
    let bad_base64 = r#"{"endpoint":"key","method":"m","params":[{"type":"ed25519","value":"!!"}]}"#;
    assert_eq!(StepSpec::from_json(bad_base64.as_bytes()).unwrap_err().kind(), StepErrorKind::MalformedPlan);
}

#[test]
fn plan_source_requires_exactly_one_input() {
    let none = PlanSource::from_options(None, None).unwrap_err();
    assert_eq!(none.kind(), StepErrorKind::MalformedPlan);

    let both =
        PlanSource::from_options(Some("{}".to_string()), Some(PathBuf::from("plan.json"))).unwrap_err();
    assert_eq!(both.kind(), StepErrorKind::MalformedPlan);

    let blank = PlanSource::from_options(Some("  ".to_string()), Some(PathBuf::from("plan.json")));
    assert_eq!(blank.unwrap(), PlanSource::File(PathBuf::from("plan.json")));
}

#[test]
fn plan_source_reads_files_with_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("step.json");
    let spec = StepSpec::create_key(KeySpec::Ed25519("alice".to_string()));
    std::fs::write(&path, serde_json::to_vec(&spec).unwrap()).unwrap();

    let source = PlanSource::File(path.clone());
    assert_eq!(source.load(1024).unwrap(), spec);
    assert_eq!(source.load(8).unwrap_err().kind(), StepErrorKind::MalformedPlan);

    let missing = PlanSource::File(dir.path().join("missing.json"));
    assert_eq!(missing.load(1024).unwrap_err().kind(), StepErrorKind::MalformedPlan);
}
