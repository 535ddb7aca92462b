// crates/simulator-core/src/interfaces/mod.rs
// ============================================================================
// Module: Simulator Interfaces
// Description: Collaborator contracts for state, keys, programs, and time.
// Purpose: Define the narrow surfaces the plan engine calls into.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The plan engine never implements storage, cryptography, program loading,
//! or program execution itself. It reaches those collaborators through the
//! traits defined here. All calls are synchronous; one step completes before
//! the next step begins resolving its parameters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use thiserror::Error;

use crate::core::Address;
use crate::core::Parameter;
use crate::core::ProgramId;
use crate::core::PublicKey;

// ============================================================================
// SECTION: State Store
// ============================================================================

/// State store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("state store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("state store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("state store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("state store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("state store error: {0}")]
    Store(String),
}

/// Mutable key/value state shared by every step of a plan run.
pub trait StateStore {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn insert(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    /// Removes the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn remove(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// Returns true when a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn contains(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

// ============================================================================
// SECTION: Key Store
// ============================================================================

/// Named key store errors.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// A key with this name already exists; carries the existing public key.
    #[error("duplicate key name: {name}")]
    AlreadyExists {
        /// Requested key name.
        name: String,
        /// Public key already stored under the name.
        public_key: PublicKey,
    },
    /// The key name is not acceptable.
    #[error("invalid key name: {0}")]
    InvalidName(String),
    /// Stored key material is unreadable.
    #[error("corrupt key material: {0}")]
    Corrupt(String),
    /// Underlying state store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Store of named cryptographic keys persisted in the state store.
pub trait KeyStore {
    /// Creates a key under `name` and returns its public key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::AlreadyExists`] when the name is taken, or
    /// another [`KeyStoreError`] when creation fails.
    fn create_named_key(
        &self,
        store: &mut dyn StateStore,
        name: &str,
    ) -> Result<PublicKey, KeyStoreError>;

    /// Returns the public key stored under `name`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError`] when the lookup fails.
    fn public_key(
        &self,
        store: &dyn StateStore,
        name: &str,
    ) -> Result<Option<PublicKey>, KeyStoreError>;
}

// ============================================================================
// SECTION: Program Loader
// ============================================================================

/// Program loader errors.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Reading the program module failed.
    #[error("program io error: {0}")]
    Io(String),
    /// The program module exceeds the configured size limit.
    #[error("program module too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual module size in bytes.
        actual_bytes: u64,
    },
    /// The program module is not acceptable.
    #[error("invalid program module: {0}")]
    Invalid(String),
    /// Underlying state store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Creates programs from module files.
pub trait ProgramLoader {
    /// Loads the module at `path` and returns the new program identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError`] when the module cannot be read or stored.
    fn create(&self, store: &mut dyn StateStore, path: &Path) -> Result<ProgramId, LoaderError>;
}

// ============================================================================
// SECTION: Program Interpreter
// ============================================================================

/// Program interpreter errors.
#[derive(Debug, Error)]
pub enum InterpreterError {
    /// No interpreter is available in this host.
    #[error("program interpreter unavailable: {0}")]
    Unavailable(String),
    /// The call ran out of its unit budget.
    #[error("out of units: budget {max_units}")]
    OutOfUnits {
        /// Budget that was exhausted.
        max_units: u64,
    },
    /// The program trapped or returned an error.
    #[error("program execution failed: {0}")]
    Execution(String),
    /// Underlying state store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A single program method call handed to the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    /// Program to invoke.
    pub program_id: ProgramId,
    /// Method name, forwarded verbatim.
    pub method: &'a str,
    /// Resolved call arguments (the program identifier is not included).
    pub params: &'a [Parameter],
    /// Unit budget; `u64::MAX` for read-only calls.
    pub max_units: u64,
    /// Address of the calling named key, when the step names one.
    pub caller: Option<Address>,
}

/// Result of a program method call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome {
    /// Identifier of the call.
    pub call_id: ProgramId,
    /// Result payloads; `None` marks an empty result slot.
    pub results: Vec<Option<Vec<u8>>>,
    /// Caller balance after the call.
    pub balance: u64,
}

/// Executes program methods against the state store.
pub trait ProgramInterpreter {
    /// Invokes a program method.
    ///
    /// # Errors
    ///
    /// Returns [`InterpreterError`] when the call fails.
    fn invoke(
        &self,
        store: &mut dyn StateStore,
        invocation: &Invocation<'_>,
    ) -> Result<InvocationOutcome, InterpreterError>;
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Source of completion timestamps for step responses.
pub trait Clock {
    /// Returns the current time as unix seconds.
    fn now_unix_secs(&self) -> u64;
}
