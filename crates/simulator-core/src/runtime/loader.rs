// crates/simulator-core/src/runtime/loader.rs
// ============================================================================
// Module: Simulator File Program Loader
// Description: Creates programs from module files on disk.
// Purpose: Store module bytes under a freshly generated program identifier.
// Dependencies: rand, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`FileProgramLoader`] reads a module file with a hard size limit, draws a
//! random 32-byte [`ProgramId`] from OS randomness, and stores the module
//! bytes under `program/<hex id>`. Module contents are not inspected beyond
//! being non-empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use rand::RngCore;
use rand::rngs::OsRng;

use crate::core::PROGRAM_ID_LEN;
use crate::core::ProgramId;
use crate::core::ReadLimitError;
use crate::core::read_bytes_with_limit;
use crate::interfaces::LoaderError;
use crate::interfaces::ProgramLoader;
use crate::interfaces::StateStore;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum module size in bytes.
pub const DEFAULT_MAX_PROGRAM_BYTES: usize = 16 * 1024 * 1024;
/// State store key prefix for program modules.
pub const PROGRAM_STORAGE_PREFIX: &[u8] = b"program/";
/// Identifier draws attempted before giving up on a collision-free id.
const MAX_ID_ATTEMPTS: usize = 4;

// ============================================================================
// SECTION: File Loader
// ============================================================================

/// Program loader that reads module files from disk.
#[derive(Debug, Clone, Copy)]
pub struct FileProgramLoader {
    /// Maximum module size in bytes.
    max_program_bytes: usize,
}

impl Default for FileProgramLoader {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROGRAM_BYTES)
    }
}

impl FileProgramLoader {
    /// Creates a loader with an explicit module size limit.
    #[must_use]
    pub const fn new(max_program_bytes: usize) -> Self {
        Self {
            max_program_bytes,
        }
    }

    /// Returns the configured module size limit.
    #[must_use]
    pub const fn max_program_bytes(&self) -> usize {
        self.max_program_bytes
    }
}

impl ProgramLoader for FileProgramLoader {
    fn create(&self, store: &mut dyn StateStore, path: &Path) -> Result<ProgramId, LoaderError> {
        let module = read_bytes_with_limit(path, self.max_program_bytes).map_err(|err| match err {
            ReadLimitError::Io(err) => LoaderError::Io(format!("{}: {err}", path.display())),
            ReadLimitError::TooLarge {
                size,
                limit,
            } => LoaderError::TooLarge {
                max_bytes: limit,
                actual_bytes: size,
            },
        })?;
        if module.is_empty() {
            return Err(LoaderError::Invalid(format!("{} is empty", path.display())));
        }

        for _ in 0 .. MAX_ID_ATTEMPTS {
            let program_id = random_program_id();
            let key = program_storage_key(&program_id);
            if store.contains(&key)? {
                continue;
            }
            store.insert(&key, module)?;
            return Ok(program_id);
        }
        Err(LoaderError::Invalid("could not allocate a unique program id".to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the state store key holding a program module.
#[must_use]
pub fn program_storage_key(program_id: &ProgramId) -> Vec<u8> {
    let mut key = PROGRAM_STORAGE_PREFIX.to_vec();
    key.extend_from_slice(program_id.to_string().as_bytes());
    key
}

/// Draws a random program identifier.
fn random_program_id() -> ProgramId {
    let mut bytes = [0u8; PROGRAM_ID_LEN];
    OsRng.fill_bytes(&mut bytes);
    ProgramId::new(bytes)
}
