// crates/simulator-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI Message Catalog Tests
// Description: Unit tests for catalog lookup and placeholder substitution.
// Purpose: Ensure CLI messages render consistently.
// Dependencies: simulator-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies catalog lookups, fallbacks, and the `t!` macro.

use crate::i18n::MessageArg;
use crate::i18n::has_key;
use crate::i18n::translate;

#[test]
fn translate_substitutes_placeholders() {
    let output = translate(
        "plan.halted",
        vec![MessageArg::new("step", "2"), MessageArg::new("error", "named key not found: bob")],
    );
    assert_eq!(output, "Plan halted at step 2: named key not found: bob");
}

#[test]
fn missing_key_falls_back_to_key() {
    assert!(!has_key("no.such.key"));
    assert_eq!(translate("no.such.key", Vec::new()), "no.such.key");
}

#[test]
fn macro_formats_display_values() {
    assert!(has_key("run.rejected"));
    let output = crate::t!("run.rejected", step = 3, error = "invalid endpoint: bogus");
    assert_eq!(output, "Step 3 rejected: invalid endpoint: bogus");
}
