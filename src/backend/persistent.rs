//! Persistent namespace backed by fjall.

use std::path::{Path, PathBuf};

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::logging::{debug, info, trace, warn};

use super::error::BackendError;
use super::format;
use super::types::{Mutation, StoredValue};
use super::Backend;

/// Keyspace holding the namespace entries.
const ENTRIES_KEYSPACE: &str = "entries";

/// Leading byte of every stored key, so the empty user key maps to a
/// non-empty storage key.
const KEY_PREFIX: u8 = b'k';

/// Longest user key, in bytes, that fits under the storage key limit.
pub const MAX_KEY_LEN: usize = u16::MAX as usize - 1;

/// Map a user key to its storage key.
fn stored_key(key: &str) -> Result<Vec<u8>, BackendError> {
    if key.len() > MAX_KEY_LEN {
        return Err(BackendError::KeyTooLong {
            len: key.len(),
            max: MAX_KEY_LEN,
        });
    }
    let mut stored = Vec::with_capacity(key.len() + 1);
    stored.push(KEY_PREFIX);
    stored.extend_from_slice(key.as_bytes());
    Ok(stored)
}

/// Map a storage key back to the user key.
fn user_key(stored: &[u8]) -> Result<String, BackendError> {
    let bytes = stored
        .strip_prefix(&[KEY_PREFIX])
        .ok_or_else(|| BackendError::Corrupt("stored key without prefix".to_string()))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| BackendError::Corrupt("non UTF-8 key in namespace".to_string()))
}

/// A namespace stored on disk in its own fjall database.
///
/// Each entry is written with the [`format`] encoding. Keys are stored with a
/// one-byte prefix; keys longer than [`MAX_KEY_LEN`] cannot be written and
/// are reported as absent on read. [`apply`](Backend::apply)
/// only hands the write to fjall, which journals it and flushes on its own
/// schedule. [`commit`](Backend::commit) additionally syncs the journal to disk
/// before returning.
///
/// # Example
///
/// ```ignore
/// use typed_prefs::backend::{Backend, FjallBackend, Mutation, StoredValue};
///
/// let backend = FjallBackend::open("/data/app/com.example-prefs")?;
/// let saved = backend.commit(Mutation::put("launches", StoredValue::Int(3)));
/// ```
pub struct FjallBackend {
    db: fjall::Database,
    entries: Keyspace,
    path: PathBuf,
}

impl FjallBackend {
    /// Open the namespace at `path`, creating it if absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening namespace");

        let db = fjall::Database::builder(path).open()?;
        let entries = db.keyspace(ENTRIES_KEYSPACE, KeyspaceCreateOptions::default)?;

        info!(path = %path.display(), "namespace opened");
        Ok(Self {
            db,
            entries,
            path: path.to_path_buf(),
        })
    }

    /// Directory of this namespace.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, mutation: Mutation) -> Result<(), BackendError> {
        match mutation {
            Mutation::Put { key, value } => {
                trace!(key = %key, kind = %value.kind(), "put entry");
                let stored = stored_key(&key)?;
                let bytes = format::encode(&value)?;
                self.entries.insert(stored, bytes)?;
            }
            Mutation::Remove { key } => {
                trace!(key = %key, "remove entry");
                // An oversized key was never written.
                if let Ok(stored) = stored_key(&key) {
                    self.entries.remove(stored)?;
                }
            }
        }
        Ok(())
    }

    fn write_durable(&self, mutation: Mutation) -> Result<(), BackendError> {
        self.write(mutation)?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

impl Backend for FjallBackend {
    fn get(&self, key: &str) -> Result<Option<StoredValue>, BackendError> {
        let Ok(stored) = stored_key(key) else {
            return Ok(None);
        };
        let Some(bytes) = self.entries.get(stored)? else {
            return Ok(None);
        };
        Ok(Some(format::decode(&bytes)?))
    }

    fn contains(&self, key: &str) -> Result<bool, BackendError> {
        let Ok(stored) = stored_key(key) else {
            return Ok(false);
        };
        Ok(self.entries.get(stored)?.is_some())
    }

    fn apply(&self, mutation: Mutation) -> Result<(), BackendError> {
        self.write(mutation)
    }

    fn commit(&self, mutation: Mutation) -> bool {
        let key = mutation.key().to_string();
        match self.write_durable(mutation) {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %key, error = %e, "commit failed");
                false
            }
        }
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let mut keys = Vec::new();
        for kv in self.entries.iter() {
            let key_bytes = kv.key()?;
            keys.push(user_key(&key_bytes)?);
        }
        Ok(keys)
    }
}
