// crates/simulator-config/src/lib.rs
// ============================================================================
// Module: Simulator Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for simulator.toml semantics.
// Dependencies: simulator-core, simulator-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `simulator-config` defines the configuration model for the simulator
//! command-line host: which state store backs a run, where audit events go,
//! and the byte limits applied to plan and program inputs. Validation fails
//! closed; an unusable config is rejected before any step runs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
