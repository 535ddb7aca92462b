// crates/simulator-core/src/runtime/ledger.rs
// ============================================================================
// Module: Simulator Run Ledger
// Description: Step index to generated identifier table plus step counter.
// Purpose: Let later steps reference identifiers produced by earlier steps.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The [`RunLedger`] is owned by one plan runner for the lifetime of a run.
//! Entries are only ever added, never removed, and the step counter only
//! moves forward.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::ProgramId;

// ============================================================================
// SECTION: Run Ledger
// ============================================================================

/// Identifiers generated by completed steps, keyed by step index.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunLedger {
    /// Generated identifiers by step index.
    ids: BTreeMap<usize, ProgramId>,
    /// Index of the next step to run.
    next_step: usize,
}

impl RunLedger {
    /// Creates an empty ledger starting at step 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: BTreeMap::new(),
            next_step: 0,
        }
    }

    /// Returns the index of the next step to run.
    #[must_use]
    pub const fn next_step(&self) -> usize {
        self.next_step
    }

    /// Returns the identifier recorded for step `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ProgramId> {
        self.ids.get(&index).copied()
    }

    /// Records the identifier generated by step `index`.
    ///
    /// An existing entry is kept; the first recorded identifier wins.
    pub fn record(&mut self, index: usize, id: ProgramId) {
        self.ids.entry(index).or_insert(id);
    }

    /// Advances the step counter and returns the new value.
    pub const fn advance(&mut self) -> usize {
        self.next_step += 1;
        self.next_step
    }

    /// Returns the number of recorded identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true when no identifiers are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates recorded identifiers in step order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, ProgramId)> + '_ {
        self.ids.iter().map(|(index, id)| (*index, *id))
    }
}
