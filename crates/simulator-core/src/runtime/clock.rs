// crates/simulator-core/src/runtime/clock.rs
// ============================================================================
// Module: Simulator Clock
// Description: Wall-clock implementation of the clock interface.
// Purpose: Keep wall-clock reads out of the dispatch path.
// Dependencies: crate::interfaces
// ============================================================================

//! Wall-clock [`Clock`] used by the command-line front end.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::interfaces::Clock;

// ============================================================================
// SECTION: System Clock
// ============================================================================

/// Clock backed by [`SystemTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_secs(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
    }
}
