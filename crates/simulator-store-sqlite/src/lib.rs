// crates/simulator-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite State Store
// Description: Durable StateStore backend using SQLite.
// Purpose: Persist keys, programs, and program state between simulator runs.
// Dependencies: simulator-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`StateStore`] implementation. Every
//! entry the plan engine writes (named keys, program modules, program state)
//! lands in a single key/value table, so a later interpreter session or CLI
//! invocation sees what an earlier one created.
//!
//! [`StateStore`]: simulator_core::StateStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_VALUE_BYTES;
pub use store::SqliteStateStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use store::remove_database_files;
