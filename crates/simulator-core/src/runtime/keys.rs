// crates/simulator-core/src/runtime/keys.rs
// ============================================================================
// Module: Simulator Named Keys
// Description: Ed25519 named-key store persisted in the state store.
// Purpose: Create and look up caller keys by name.
// Dependencies: ed25519-dalek, rand, crate::interfaces
// ============================================================================

//! ## Overview
//! [`Ed25519KeyStore`] generates a signing key from OS randomness and stores
//! the 32-byte secret under `key/<name>`. Public keys are derived from the
//! stored secret on every lookup, so the state store never holds a public key
//! that could drift from its secret.
//!
//! Creating a key whose name is already taken fails with
//! [`KeyStoreError::AlreadyExists`] carrying the existing public key; callers
//! decide whether reuse is acceptable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ed25519_dalek::SECRET_KEY_LENGTH;
use ed25519_dalek::SigningKey;
use rand::RngCore;
use rand::rngs::OsRng;

use crate::core::PublicKey;
use crate::interfaces::KeyStore;
use crate::interfaces::KeyStoreError;
use crate::interfaces::StateStore;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// State store key prefix for named key secrets.
pub const KEY_STORAGE_PREFIX: &[u8] = b"key/";
/// Maximum length of a key name in bytes.
pub const MAX_KEY_NAME_BYTES: usize = 255;

// ============================================================================
// SECTION: Ed25519 Key Store
// ============================================================================

/// Named Ed25519 keys backed by the state store.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519KeyStore;

impl Ed25519KeyStore {
    /// Creates a key store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl KeyStore for Ed25519KeyStore {
    fn create_named_key(
        &self,
        store: &mut dyn StateStore,
        name: &str,
    ) -> Result<PublicKey, KeyStoreError> {
        let storage_key = storage_key(name)?;
        if let Some(secret) = store.get(&storage_key)? {
            return Err(KeyStoreError::AlreadyExists {
                name: name.to_string(),
                public_key: public_key_from_secret(name, &secret)?,
            });
        }

        let mut secret = [0u8; SECRET_KEY_LENGTH];
        OsRng.fill_bytes(&mut secret);
        let public_key = PublicKey::new(SigningKey::from_bytes(&secret).verifying_key().to_bytes());
        store.insert(&storage_key, secret.to_vec())?;
        Ok(public_key)
    }

    fn public_key(
        &self,
        store: &dyn StateStore,
        name: &str,
    ) -> Result<Option<PublicKey>, KeyStoreError> {
        let storage_key = storage_key(name)?;
        store
            .get(&storage_key)?
            .map(|secret| public_key_from_secret(name, &secret))
            .transpose()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the state store key for a named key.
fn storage_key(name: &str) -> Result<Vec<u8>, KeyStoreError> {
    if name.is_empty() {
        return Err(KeyStoreError::InvalidName("key name is empty".to_string()));
    }
    if name.len() > MAX_KEY_NAME_BYTES {
        return Err(KeyStoreError::InvalidName(format!(
            "key name exceeds {MAX_KEY_NAME_BYTES} bytes"
        )));
    }
    let mut key = Vec::with_capacity(KEY_STORAGE_PREFIX.len() + name.len());
    key.extend_from_slice(KEY_STORAGE_PREFIX);
    key.extend_from_slice(name.as_bytes());
    Ok(key)
}

/// Derives the public key from stored secret bytes.
fn public_key_from_secret(name: &str, secret: &[u8]) -> Result<PublicKey, KeyStoreError> {
    let secret = <[u8; SECRET_KEY_LENGTH]>::try_from(secret).map_err(|_| {
        KeyStoreError::Corrupt(format!(
            "secret for {name} is {} bytes (expected {SECRET_KEY_LENGTH})",
            secret.len()
        ))
    })?;
    Ok(PublicKey::new(SigningKey::from_bytes(&secret).verifying_key().to_bytes()))
}
