//! Unified error type for the typed-prefs library.
//!
//! This module provides a single [`Error`] type that encompasses all errors
//! that can occur in the library, making it easier to handle errors in
//! application code.

use thiserror::Error;

use crate::backend::{BackendError, ValueKind};
use crate::config::ConfigError;
use crate::crypto::CryptoError;

/// Unified error type for all typed-prefs operations.
///
/// A missing key is never an error: getters fall back to the supplied
/// default. A failed synchronous commit is reported through the return value
/// (`false` or [`SaveOutcome::NotSaved`](crate::SaveOutcome::NotSaved)).
///
/// # Example
///
/// ```ignore
/// use typed_prefs::{AppContext, Result, TypedStore};
///
/// fn remember_volume(ctx: &AppContext, volume: f32) -> Result<bool> {
///     let store = TypedStore::init(ctx, false)?;
///     store.put_sync("volume", volume)
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the underlying key-value namespace.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Error setting up or using the encryption layer.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// JSON encoding or decoding of a structured value failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The key holds a value of a different kind than the one requested.
    #[error("Type mismatch for key '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a type mismatch error for `key`.
    pub fn type_mismatch(key: impl Into<String>, expected: ValueKind, found: ValueKind) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
            found,
        }
    }

    /// Returns `true` if this is a backend error.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// Returns `true` if this is an encryption error, wherever it surfaced.
    pub fn is_crypto(&self) -> bool {
        matches!(self, Self::Crypto(_) | Self::Backend(BackendError::Crypto(_)))
    }

    /// Returns `true` if this is a JSON codec error.
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json(_))
    }

    /// Returns `true` if this is a kind mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}
