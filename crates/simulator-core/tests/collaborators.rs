// crates/simulator-core/tests/collaborators.rs
// ============================================================================
// Module: Default Collaborator Tests
// Description: In-memory store, Ed25519 key store, and file program loader.
// Purpose: Ensure default collaborators honor their interface contracts.
// ============================================================================

//! Default collaborator tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use simulator_core::Ed25519KeyStore;
use simulator_core::FileProgramLoader;
use simulator_core::InMemoryStateStore;
use simulator_core::KeyStore;
use simulator_core::KeyStoreError;
use simulator_core::LoaderError;
use simulator_core::ProgramLoader;
use simulator_core::StateStore;
use simulator_core::runtime::KEY_STORAGE_PREFIX;
use simulator_core::runtime::program_storage_key;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

#[test]
fn in_memory_store_round_trips_and_removes() {
    let mut store = InMemoryStateStore::new();
    assert!(store.is_empty());
    store.insert(b"a", b"1".to_vec()).unwrap();
    store.insert(b"a", b"2".to_vec()).unwrap();
    assert_eq!(store.get(b"a").unwrap(), Some(b"2".to_vec()));
    assert!(store.contains(b"a").unwrap());
    assert_eq!(store.len(), 1);
    store.remove(b"a").unwrap();
    assert_eq!(store.get(b"a").unwrap(), None);
    store.remove(b"missing").unwrap();
}

// ============================================================================
// SECTION: Key Store
// ============================================================================

#[test]
fn named_key_is_stored_and_derivable() {
    let keys = Ed25519KeyStore::new();
    let mut store = InMemoryStateStore::new();
    assert_eq!(keys.public_key(&store, "alice").unwrap(), None);

    let created = keys.create_named_key(&mut store, "alice").unwrap();
    assert_eq!(keys.public_key(&store, "alice").unwrap(), Some(created));

    let mut storage_key = KEY_STORAGE_PREFIX.to_vec();
    storage_key.extend_from_slice(b"alice");
    assert_eq!(store.get(&storage_key).unwrap().map(|secret| secret.len()), Some(32));
}

#[test]
fn duplicate_key_name_reports_existing_key() {
    let keys = Ed25519KeyStore::new();
    let mut store = InMemoryStateStore::new();
    let created = keys.create_named_key(&mut store, "alice").unwrap();

    match keys.create_named_key(&mut store, "alice") {
        Err(KeyStoreError::AlreadyExists {
            name,
            public_key,
        }) => {
            assert_eq!(name, "alice");
            assert_eq!(public_key, created);
        }
        other => panic!("expected duplicate, got {other:?}"),
    }
}

#[test]
fn distinct_names_get_distinct_keys() {
    let keys = Ed25519KeyStore::new();
    let mut store = InMemoryStateStore::new();
    let alice = keys.create_named_key(&mut store, "alice").unwrap();
    let bob = keys.create_named_key(&mut store, "bob").unwrap();
    assert_ne!(alice, bob);
}

#[test]
fn empty_and_corrupt_keys_fail_closed() {
    let keys = Ed25519KeyStore::new();
    let mut store = InMemoryStateStore::new();
    assert!(matches!(
        keys.create_named_key(&mut store, ""),
        Err(KeyStoreError::InvalidName(_))
    ));

    let mut storage_key = KEY_STORAGE_PREFIX.to_vec();
    storage_key.extend_from_slice(b"broken");
    store.insert(&storage_key, vec![1, 2, 3]).unwrap();
    assert!(matches!(keys.public_key(&store, "broken"), Err(KeyStoreError::Corrupt(_))));
}

// ============================================================================
// SECTION: Program Loader
// ============================================================================

#[test]
fn loader_stores_module_under_fresh_id() {
    let dir = tempfile::tempdir().unwrap();
    let module = common::write_module(&dir, "counter.wasm");
    let loader = FileProgramLoader::default();
    let mut store = InMemoryStateStore::new();

    let first = loader.create(&mut store, &module).unwrap();
    let second = loader.create(&mut store, &module).unwrap();
    assert_ne!(first, second);
    assert_eq!(
        store.get(&program_storage_key(&first)).unwrap(),
        Some(std::fs::read(&module).unwrap())
    );
}

#[test]
fn loader_enforces_size_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.wasm");
    std::fs::write(&path, vec![0u8; 64]).unwrap();
    let loader = FileProgramLoader::new(16);
    let mut store = InMemoryStateStore::new();

    let err = loader.create(&mut store, &path).unwrap_err();
    assert!(matches!(
        err,
        LoaderError::TooLarge {
            max_bytes: 16,
            actual_bytes: 64
        }
    ));
    assert!(store.is_empty());
}

#[test]
fn loader_reports_missing_file_as_io() {
    let dir = tempfile::tempdir().unwrap();
    let loader = FileProgramLoader::default();
    let mut store = InMemoryStateStore::new();
    let err = loader.create(&mut store, &dir.path().join("missing.wasm")).unwrap_err();
    assert!(matches!(err, LoaderError::Io(_)));
}
