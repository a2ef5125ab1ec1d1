//! Common test utilities and fixtures.
//!
//! Shared constants, helper functions, and fixtures used across the
//! integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use typed_prefs::crypto::{DEFAULT_MASTER_KEY_ALIAS, EncryptedBackend, MemoryKeyStore};
use typed_prefs::{AppContext, MemoryBackend, TypedStore};

// =============================================================================
// Fixtures
// =============================================================================

/// Package name used by every on-disk test.
pub const TEST_PACKAGE: &str = "com.example.notes";

/// A structured value with nested collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u8,
    pub tags: Vec<String>,
    pub scores: BTreeMap<String, f64>,
}

pub fn sample_profile() -> Profile {
    Profile {
        name: "Ada".to_string(),
        age: 36,
        tags: vec!["admin".to_string(), "beta".to_string()],
        scores: [("chess".to_string(), 9.5), ("go".to_string(), -1.25)]
            .into_iter()
            .collect(),
    }
}

// =============================================================================
// Store Helpers
// =============================================================================

/// A fresh application context rooted in a temporary directory.
///
/// The `TempDir` must be kept alive for the duration of the test.
pub fn temp_context() -> anyhow::Result<(TempDir, AppContext)> {
    let dir = TempDir::new()?;
    let ctx = AppContext::new(TEST_PACKAGE, dir.path());
    Ok((dir, ctx))
}

/// A store over an in-memory namespace, plus the namespace itself so tests can
/// make commits fail.
pub fn memory_store() -> (Arc<MemoryBackend>, TypedStore) {
    let backend = Arc::new(MemoryBackend::new());
    let store = TypedStore::with_backend(backend.clone());
    (backend, store)
}

/// A store over an encrypted in-memory namespace.
pub fn encrypted_memory_store() -> anyhow::Result<(Arc<MemoryBackend>, TypedStore)> {
    let inner = Arc::new(MemoryBackend::new());
    let keys = MemoryKeyStore::new();
    let backend = EncryptedBackend::open(
        inner.clone(),
        &keys,
        DEFAULT_MASTER_KEY_ALIAS,
        "com.example.notes-prefs",
    )?;
    Ok((inner, TypedStore::with_backend(Arc::new(backend))))
}

/// Run `f` against a plain and an encrypted in-memory store.
pub fn for_each_store(
    mut f: impl FnMut(&str, &MemoryBackend, &TypedStore) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let (backend, store) = memory_store();
    f("plain", &backend, &store)?;
    let (backend, store) = encrypted_memory_store()?;
    f("encrypted", &backend, &store)?;
    Ok(())
}
