// crates/simulator-core/tests/identifiers.rs
// ============================================================================
// Module: Identifier Tests
// Description: Program id text forms, addresses, and step references.
// ============================================================================

//! Identifier parsing and formatting tests.

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
use simulator_core::Address;
use simulator_core::IdentifierError;
use simulator_core::ProgramId;
use simulator_core::PublicKey;
use simulator_core::StepRef;

#[test]
fn program_id_rejects_bad_hex() {
    assert_eq!(
        "abc".parse::<ProgramId>(),
        Err(IdentifierError::Length {
            expected: 64,
            actual: 3
        })
    );
    assert_eq!("zz".repeat(32).parse::<ProgramId>(), Err(IdentifierError::InvalidHex));
}

#[test]
fn program_id_param_value_accepts_raw_or_hex() {
    let id = ProgramId::new([0x5a; 32]);
    assert_eq!(ProgramId::from_param_value(id.as_bytes()), Some(id));
    assert_eq!(ProgramId::from_param_value(id.to_string().to_uppercase().as_bytes()), Some(id));
    assert_eq!(ProgramId::from_param_value(b"./module.wasm"), None);
    assert_eq!(ProgramId::from_param_value(&[1u8; 31]), None);
}

#[test]
fn address_prefixes_public_key() {
    let key = PublicKey::new([7; 32]);
    let address = Address::from_ed25519(&key);
    assert_eq!(address.as_bytes()[0], 0);
    assert_eq!(&address.as_bytes()[1 ..], key.as_bytes());
    assert_eq!(address.to_string(), format!("00{}", "07".repeat(32)));
}

#[test]
fn step_ref_renders_symbolic_form() {
    assert_eq!(StepRef::new(12).to_string(), "step_12");
    assert_eq!(StepRef::from(3).index(), 3);
}

proptest! {
    #[test]
    fn program_id_text_form_parses_back(bytes in prop::array::uniform32(any::<u8>())) {
        let id = ProgramId::new(bytes);
        let text = id.to_string();
        prop_assert_eq!(text.len(), 64);
        prop_assert_eq!(text.parse::<ProgramId>().unwrap(), id);
        let json = serde_json::to_string(&id).unwrap();
        prop_assert_eq!(serde_json::from_str::<ProgramId>(&json).unwrap(), id);
    }
}
