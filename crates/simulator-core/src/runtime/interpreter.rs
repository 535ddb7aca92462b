// crates/simulator-core/src/runtime/interpreter.rs
// ============================================================================
// Module: Simulator Unavailable Interpreter
// Description: Interpreter placeholder for hosts without a program runtime.
// Purpose: Fail program calls explicitly instead of fabricating results.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! The workspace does not embed a program runtime. [`UnavailableInterpreter`]
//! lets key and program-creation steps run while every program call fails
//! with [`InterpreterError::Unavailable`]. Hosts that embed a runtime pass
//! their own [`ProgramInterpreter`] to the plan runner.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::interfaces::InterpreterError;
use crate::interfaces::Invocation;
use crate::interfaces::InvocationOutcome;
use crate::interfaces::ProgramInterpreter;
use crate::interfaces::StateStore;

// ============================================================================
// SECTION: Unavailable Interpreter
// ============================================================================

/// Interpreter that rejects every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableInterpreter;

impl ProgramInterpreter for UnavailableInterpreter {
    fn invoke(
        &self,
        _store: &mut dyn StateStore,
        invocation: &Invocation<'_>,
    ) -> Result<InvocationOutcome, InterpreterError> {
        Err(InterpreterError::Unavailable(format!(
            "no program runtime configured to call {} on {}",
            invocation.method, invocation.program_id
        )))
    }
}
