//! Typed preferences over a persistent key-value namespace.
//!
//! typed-prefs gives an application one private namespace of settings with
//! typed accessors for strings, booleans, 32/64-bit integers, floats, doubles,
//! string sets and any serde-serializable value (stored as JSON). The
//! namespace can be encrypted at rest: key names with deterministic AES-SIV,
//! values with AES-256-GCM.
//!
//! # Quick Start
//!
//! ```ignore
//! use typed_prefs::prelude::*;
//!
//! let ctx = AppContext::new("com.example.notes", "/var/lib/notes");
//! let store = TypedStore::init(&ctx, true)?;
//!
//! store.put("font_size", 14i32)?;
//! let saved = store.put_sync("ratio", 0.75f64)?;
//! let size = store.get("font_size", 12i32)?;
//!
//! match store.put_sync_if_absent("installed_at", 1_700_000_000i64)? {
//!     SaveOutcome::KeyAlreadyExists => {}
//!     SaveOutcome::SavedSuccessfully => {}
//!     SaveOutcome::NotSaved => eprintln!("could not persist install time"),
//! }
//! ```
//!
//! # Modules
//!
//! - [`store`] - The [`TypedStore`] facade and [`StoreCell`]
//! - [`backend`] - Namespaces the facade writes to
//! - [`crypto`] - Encryption at rest and master key storage
//! - [`codec`] - JSON encoding of structured values
//! - [`config`] - Application identity and TOML configuration
//! - [`error`] - Unified error types
//!
//! # Feature Flags
//!
//! - `kv` - Enable the on-disk namespace backed by fjall (enabled by default)
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `full` - Enable all features

#[macro_use]
pub(crate) mod logging;

pub mod backend;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod prelude;
pub mod store;

// Re-export the unified error type
pub use error::{Error, Result};

pub use backend::{Backend, BackendError, MemoryBackend, Mutation, StoredValue, ValueKind};
#[cfg(feature = "kv")]
pub use backend::{FjallBackend, MAX_KEY_LEN};
pub use config::{AppContext, ConfigError, NAMESPACE_SUFFIX, StoreConfig};
pub use crypto::{CryptoError, EncryptedBackend, FileKeyStore, MasterKeyStore, MemoryKeyStore};
pub use store::{Json, Preference, SaveOutcome, StoreCell, TypedStore};
