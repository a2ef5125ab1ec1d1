//! The typed facade over a namespace.

mod cell;
mod value;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(feature = "kv")]
use crate::backend::FjallBackend;
use crate::backend::{Backend, MemoryBackend, Mutation, StoredValue};
use crate::codec;
#[cfg(feature = "kv")]
use crate::config::{AppContext, StoreConfig};
#[cfg(feature = "kv")]
use crate::crypto::{DEFAULT_MASTER_KEY_ALIAS, EncryptedBackend, FileKeyStore, MasterKeyStore};
use crate::error::Result;
use crate::logging::{debug, trace, warn};
#[cfg(feature = "kv")]
use crate::logging::{error, info};

pub use cell::StoreCell;
pub use value::{Json, Preference};

/// Result of [`TypedStore::put_sync_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveOutcome {
    /// The key was already present; nothing was written.
    KeyAlreadyExists,
    /// The key was absent and the value was committed.
    SavedSuccessfully,
    /// The key was absent but the commit failed.
    NotSaved,
}

/// Typed get/put access to one namespace.
///
/// Cloning is cheap and every clone shares the same namespace. Getters never
/// fail for a missing key: they return the default passed by the caller.
///
/// # Example
///
/// ```ignore
/// use typed_prefs::{AppContext, Json, TypedStore};
///
/// let ctx = AppContext::new("com.example.notes", "/var/lib/notes");
/// let store = TypedStore::init(&ctx, true)?;
///
/// store.put("launches", store.get("launches", 0i32)? + 1)?;
/// let saved = store.put_sync("theme", "dark".to_string())?;
///
/// store.put_list("recent", &["a.txt", "b.txt"])?;
/// let recent: Vec<String> = store.get_list("recent", Vec::new())?;
/// ```
///
/// # Consistency
///
/// Each single operation is as atomic as the backend makes it. The compound
/// operations ([`put_if_absent`](Self::put_if_absent),
/// [`put_sync_if_absent`](Self::put_sync_if_absent) and
/// [`get_and_remove`](Self::get_and_remove)) issue two separate backend calls,
/// and a concurrent writer to the same key can run in between.
#[derive(Clone)]
pub struct TypedStore {
    backend: Arc<dyn Backend>,
    encrypted: bool,
}

impl std::fmt::Debug for TypedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedStore")
            .field("encrypted", &self.encrypted)
            .finish_non_exhaustive()
    }
}

impl TypedStore {
    /// Open the namespace of the application described by `ctx`.
    ///
    /// With `encrypted` set, the namespace is opened through
    /// [`EncryptedBackend`] with the default master key held in a
    /// [`FileKeyStore`] under [`AppContext::key_store_dir`]. Any failure to set
    /// up storage or encryption is returned.
    #[cfg(feature = "kv")]
    pub fn init(ctx: &AppContext, encrypted: bool) -> Result<Self> {
        if encrypted {
            let key_store = FileKeyStore::new(ctx.key_store_dir());
            Self::init_encrypted(ctx, &key_store)
        } else {
            let backend = FjallBackend::open(ctx.namespace_path()).inspect_err(|e| {
                error!(namespace = %ctx.namespace_name(), error = %e, "failed to open namespace");
            })?;
            info!(namespace = %ctx.namespace_name(), "typed store ready");
            Ok(Self::from_parts(Arc::new(backend), false))
        }
    }

    /// Open the application's namespace encrypted with a master key from `key_store`.
    #[cfg(feature = "kv")]
    pub fn init_encrypted(ctx: &AppContext, key_store: &dyn MasterKeyStore) -> Result<Self> {
        let namespace = ctx.namespace_name();
        let open = || -> Result<EncryptedBackend<FjallBackend>> {
            let plain = FjallBackend::open(ctx.namespace_path())?;
            Ok(EncryptedBackend::open(
                plain,
                key_store,
                DEFAULT_MASTER_KEY_ALIAS,
                &namespace,
            )?)
        };

        let backend = open().inspect_err(|e| {
            error!(namespace = %namespace, error = %e, "failed to open encrypted namespace");
        })?;
        info!(namespace = %namespace, "encrypted typed store ready");
        Ok(Self::from_parts(Arc::new(backend), true))
    }

    /// Open the store described by a loaded configuration.
    #[cfg(feature = "kv")]
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Self::init(&config.app, config.encrypted)
    }

    /// Build a store over an arbitrary backend.
    pub fn with_backend(backend: Arc<dyn Backend>) -> Self {
        Self::from_parts(backend, false)
    }

    /// A store over a fresh in-memory namespace.
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()))
    }

    fn from_parts(backend: Arc<dyn Backend>, encrypted: bool) -> Self {
        Self { backend, encrypted }
    }

    /// Whether this store was opened with encryption at rest.
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// The backend this store writes to.
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Returns `true` if both handles share the same namespace.
    pub fn same_store(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.backend, &other.backend)
    }

    // Per-kind operations

    /// Write `value` without waiting for it to be persisted.
    pub fn put<V: Preference>(&self, key: &str, value: V) -> Result<()> {
        let stored = value.into_stored()?;
        trace!(key = key, kind = %stored.kind(), "put");
        self.backend.apply(Mutation::put(key, stored))?;
        Ok(())
    }

    /// Write `value` and block until it is persisted.
    ///
    /// Returns `Ok(false)` if the commit failed. Errors are only returned when
    /// the value could not be encoded.
    pub fn put_sync<V: Preference>(&self, key: &str, value: V) -> Result<bool> {
        let stored = value.into_stored()?;
        Ok(self.commit(key, stored))
    }

    /// Read the value under `key`, or `default` if it is absent.
    pub fn get<V: Preference>(&self, key: &str, default: V) -> Result<V> {
        let Some(stored) = self.backend.get(key)? else {
            trace!(key = key, "get: absent, using default");
            return Ok(default);
        };
        Ok(V::from_stored(key, stored)?.unwrap_or(default))
    }

    /// Write `value` only if `key` is absent. Returns whether it was written.
    pub fn put_if_absent<V: Preference>(&self, key: &str, value: V) -> Result<bool> {
        if self.backend.contains(key)? {
            debug!(key = key, "put_if_absent: key exists");
            return Ok(false);
        }
        self.put(key, value)?;
        Ok(true)
    }

    /// Commit `value` only if `key` is absent.
    pub fn put_sync_if_absent<V: Preference>(&self, key: &str, value: V) -> Result<SaveOutcome> {
        if self.backend.contains(key)? {
            debug!(key = key, "put_sync_if_absent: key exists");
            return Ok(SaveOutcome::KeyAlreadyExists);
        }
        if self.put_sync(key, value)? {
            Ok(SaveOutcome::SavedSuccessfully)
        } else {
            Ok(SaveOutcome::NotSaved)
        }
    }

    /// Read the value under `key` (or `default`), then remove the key.
    pub fn get_and_remove<V: Preference>(&self, key: &str, default: V) -> Result<V> {
        let value = self.get(key, default)?;
        self.remove(key)?;
        Ok(value)
    }

    /// Remove `key`. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        trace!(key = key, "remove");
        self.backend.apply(Mutation::remove(key))?;
        Ok(())
    }

    /// Remove `key` and block until the removal is persisted.
    pub fn remove_sync(&self, key: &str) -> bool {
        let removed = self.backend.commit(Mutation::remove(key));
        if !removed {
            warn!(key = key, "remove_sync: commit failed");
        }
        removed
    }

    /// Check whether `key` is present, whatever its kind.
    pub fn is_key_present(&self, key: &str) -> Result<bool> {
        Ok(self.backend.contains(key)?)
    }

    /// All keys in the namespace, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = self.backend.keys()?;
        keys.sort();
        Ok(keys)
    }

    /// Remove every key. Each removal is applied on its own.
    pub fn clear(&self) -> Result<()> {
        let keys = self.backend.keys()?;
        debug!(count = keys.len(), "clearing namespace");
        for key in keys {
            self.backend.apply(Mutation::remove(key))?;
        }
        Ok(())
    }

    // Structured values

    /// Store any serializable value as JSON.
    pub fn put_object<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = codec::encode(value)?;
        self.put(key, json)
    }

    /// Store any serializable value as JSON and block until persisted.
    pub fn put_object_sync<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<bool> {
        let json = codec::encode(value)?;
        Ok(self.commit(key, StoredValue::String(json)))
    }

    /// Read a JSON value as a `T`, or `default` if absent or empty.
    pub fn get_object<T: Serialize + DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.get(key, Json(default))?.into_inner())
    }

    /// Store an array of values as a JSON array.
    pub fn put_array<T: Serialize>(&self, key: &str, array: &[T]) -> Result<()> {
        self.put_object(key, array)
    }

    /// Store an array of values as a JSON array and block until persisted.
    pub fn put_array_sync<T: Serialize>(&self, key: &str, array: &[T]) -> Result<bool> {
        self.put_object_sync(key, array)
    }

    /// Read a JSON array whose elements are `T`.
    ///
    /// Returns `default` when the key is absent or holds an empty string; a
    /// stored `[]` reads back as an empty array.
    pub fn get_array<T: Serialize + DeserializeOwned + Clone>(
        &self,
        key: &str,
        default: &[T],
    ) -> Result<Vec<T>> {
        self.get_object(key, default.to_vec())
    }

    /// Store a list of values as JSON.
    pub fn put_list<T: Serialize>(&self, key: &str, list: &[T]) -> Result<()> {
        self.put_object(key, list)
    }

    /// Store a list of values as JSON and block until persisted.
    pub fn put_list_sync<T: Serialize>(&self, key: &str, list: &[T]) -> Result<bool> {
        self.put_object_sync(key, list)
    }

    /// Read a JSON list whose elements are `T`.
    pub fn get_list<T: Serialize + DeserializeOwned>(
        &self,
        key: &str,
        default: Vec<T>,
    ) -> Result<Vec<T>> {
        self.get_object(key, default)
    }

    /// Store a string-keyed map as a JSON object.
    pub fn put_map<T: Serialize>(&self, key: &str, map: &HashMap<String, T>) -> Result<()> {
        self.put_object(key, map)
    }

    /// Store a string-keyed map as a JSON object and block until persisted.
    pub fn put_map_sync<T: Serialize>(&self, key: &str, map: &HashMap<String, T>) -> Result<bool> {
        self.put_object_sync(key, map)
    }

    /// Read a JSON object as a map whose values are `T`.
    pub fn get_map<T: Serialize + DeserializeOwned>(
        &self,
        key: &str,
        default: HashMap<String, T>,
    ) -> Result<HashMap<String, T>> {
        self.get_object(key, default)
    }

    fn commit(&self, key: &str, stored: StoredValue) -> bool {
        trace!(key = key, kind = %stored.kind(), "commit");
        let saved = self.backend.commit(Mutation::put(key, stored));
        if !saved {
            warn!(key = key, "commit failed");
        }
        saved
    }
}
