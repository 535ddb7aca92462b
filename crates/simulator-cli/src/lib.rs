// crates/simulator-cli/src/lib.rs
// ============================================================================
// Module: Simulator CLI Library
// Description: Shared helpers for the simulator command-line interface.
// Purpose: Provide the message catalog, line parser, and interpreter client.
// Dependencies: serde_json, simulator-core, thiserror
// ============================================================================

//! ## Overview
//! This library houses the pieces of the `simulator` binary that are worth
//! testing on their own: the message catalog every user-facing string goes
//! through, and the parser for the `interpreter` line protocol. The
//! [`client`] module drives that protocol from the other side, spawning the
//! binary and exchanging steps and responses with it.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Interpreter process client.
pub mod client;
/// Message catalog and formatting macro.
pub mod i18n;
/// Interpreter line protocol parsing.
pub mod line;

#[cfg(test)]
mod tests;
