//! Encryption at rest for a namespace.
//!
//! [`EncryptedBackend`] wraps any [`Backend`](crate::backend::Backend) and
//! exposes the same surface while storing only ciphertext:
//!
//! - key names are encrypted with deterministic AES-SIV so lookups still work,
//! - values are encrypted with AES-256-GCM under a fresh random nonce, bound to
//!   their (encrypted) key name as associated data,
//! - both data keys live in the namespace itself, wrapped by a master key that
//!   a [`MasterKeyStore`] generates once and keeps outside the namespace.

mod encrypted;
mod error;
mod keyset;
mod keystore;

pub use encrypted::EncryptedBackend;
pub use error::CryptoError;
pub use keyset::{KEY_KEYSET_ENTRY, VALUE_KEYSET_ENTRY};
pub use keystore::{
    DEFAULT_MASTER_KEY_ALIAS, FileKeyStore, MASTER_KEY_SIZE, MasterKey, MasterKeyStore,
    MemoryKeyStore,
};
