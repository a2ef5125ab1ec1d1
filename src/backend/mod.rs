//! Key-value namespaces the typed facade sits on.
//!
//! A [`Backend`] is a flat namespace of string keys, each holding one
//! [`StoredValue`]. Writes come in two flavors: [`Backend::apply`] queues the
//! mutation and returns before it is durable, [`Backend::commit`] blocks until
//! the mutation is persisted and reports whether that succeeded.

mod error;
pub mod format;
mod memory;
#[cfg(feature = "kv")]
mod persistent;
mod types;

pub use error::BackendError;
pub use memory::MemoryBackend;
#[cfg(feature = "kv")]
pub use persistent::{FjallBackend, MAX_KEY_LEN};
pub use types::{Mutation, StoredValue, ValueKind};

/// A keyed storage area addressed by unique string keys.
///
/// Implementations serialize concurrent writers and make each single-key
/// mutation atomic. Nothing stronger is assumed by the callers in this crate.
pub trait Backend: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<StoredValue>, BackendError>;

    /// Check whether `key` is present.
    fn contains(&self, key: &str) -> Result<bool, BackendError>;

    /// Apply a mutation without waiting for it to reach persistent storage.
    fn apply(&self, mutation: Mutation) -> Result<(), BackendError>;

    /// Apply a mutation and block until it is persisted.
    ///
    /// Returns `true` if the mutation was durably written.
    fn commit(&self, mutation: Mutation) -> bool;

    /// List every key in the namespace.
    fn keys(&self) -> Result<Vec<String>, BackendError>;
}

impl<B: Backend + ?Sized> Backend for std::sync::Arc<B> {
    fn get(&self, key: &str) -> Result<Option<StoredValue>, BackendError> {
        (**self).get(key)
    }

    fn contains(&self, key: &str) -> Result<bool, BackendError> {
        (**self).contains(key)
    }

    fn apply(&self, mutation: Mutation) -> Result<(), BackendError> {
        (**self).apply(mutation)
    }

    fn commit(&self, mutation: Mutation) -> bool {
        (**self).commit(mutation)
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        (**self).keys()
    }
}
