//! Error types for the backend module.

use thiserror::Error;

use crate::crypto::CryptoError;

/// Errors that can occur while reading or writing a namespace.
#[derive(Error, Debug)]
pub enum BackendError {
    #[cfg(feature = "kv")]
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Key too long: {len} bytes (max {max})")]
    KeyTooLong { len: usize, max: usize },

    #[error("Corrupt entry: {0}")]
    Corrupt(String),

    #[error("Namespace lock poisoned")]
    Poisoned,

    #[error("Encryption error: {0}")]
    Crypto(#[from] CryptoError),
}
