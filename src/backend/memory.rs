//! In-process namespace.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::logging::{trace, warn};

use super::error::BackendError;
use super::types::{Mutation, StoredValue};
use super::Backend;

/// A namespace held entirely in memory.
///
/// `apply` and `commit` behave identically except that commits can be made to
/// fail on demand with [`set_fail_commits`](Self::set_fail_commits), which is
/// how callers exercise their "not saved" paths.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, StoredValue>>,
    fail_commits: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `commit` fail without writing.
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Number of entries currently held.
    pub fn len(&self) -> Result<usize, BackendError> {
        let entries = self.entries.read().map_err(|_| BackendError::Poisoned)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, BackendError> {
        Ok(self.len()? == 0)
    }

    fn write(&self, mutation: Mutation) -> Result<(), BackendError> {
        let mut entries = self.entries.write().map_err(|_| BackendError::Poisoned)?;
        match mutation {
            Mutation::Put { key, value } => {
                trace!(key = %key, kind = %value.kind(), "memory put");
                entries.insert(key, value);
            }
            Mutation::Remove { key } => {
                trace!(key = %key, "memory remove");
                entries.remove(&key);
            }
        }
        Ok(())
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<StoredValue>, BackendError> {
        let entries = self.entries.read().map_err(|_| BackendError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn contains(&self, key: &str) -> Result<bool, BackendError> {
        let entries = self.entries.read().map_err(|_| BackendError::Poisoned)?;
        Ok(entries.contains_key(key))
    }

    fn apply(&self, mutation: Mutation) -> Result<(), BackendError> {
        self.write(mutation)
    }

    fn commit(&self, mutation: Mutation) -> bool {
        if self.fail_commits.load(Ordering::SeqCst) {
            warn!(key = mutation.key(), "memory commit rejected");
            return false;
        }
        self.write(mutation).is_ok()
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let entries = self.entries.read().map_err(|_| BackendError::Poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}
