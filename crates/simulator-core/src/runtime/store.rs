// crates/simulator-core/src/runtime/store.rs
// ============================================================================
// Module: Simulator In-Memory State Store
// Description: Ordered in-memory key/value state for plan runs.
// Purpose: Provide a deterministic store without external dependencies.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryStateStore`] keeps every entry in a [`BTreeMap`] so iteration
//! order is stable across runs. State is lost when the store is dropped; use
//! the SQLite store for state that must outlive one process.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::interfaces::StateStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory state store for tests and single-process runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InMemoryStateStore {
    /// Stored entries keyed by raw bytes.
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for InMemoryStateStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.insert(key.to_vec(), value);
        Ok(())
    }

    fn remove(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.entries.contains_key(key))
    }
}
