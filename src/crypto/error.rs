//! Error types for the encryption layer.

use thiserror::Error;

/// Errors that can occur while setting up or using encryption.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Key store error: {0}")]
    KeyStore(#[from] std::io::Error),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Encryption failed")]
    Encrypt,

    #[error("Decryption failed: ciphertext was tampered with or the key is wrong")]
    Decrypt,

    #[error("Invalid ciphertext encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Could not persist keyset '{0}'")]
    KeysetNotSaved(String),

    #[error("Keyset storage error: {0}")]
    KeysetStorage(String),

    #[error("Keyset entry '{0}' is not a string")]
    KeysetCorrupt(String),

    #[error("Key store lock poisoned")]
    Poisoned,
}
