//! Convenient re-exports for common usage patterns.
//!
//! # Example
//!
//! ```ignore
//! use typed_prefs::prelude::*;
//!
//! let store = TypedStore::init(&AppContext::new("com.example", "data"), false)?;
//! store.put("greeting", "hello".to_string())?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Facade
pub use crate::store::{Json, Preference, SaveOutcome, StoreCell, TypedStore};

// Configuration
pub use crate::config::{AppContext, StoreConfig};

// Backends
#[cfg(feature = "kv")]
pub use crate::backend::FjallBackend;
pub use crate::backend::{Backend, MemoryBackend, StoredValue, ValueKind};

// Encryption
pub use crate::crypto::{EncryptedBackend, FileKeyStore, MasterKeyStore};
