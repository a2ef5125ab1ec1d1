//! One-time initialization of a store handle.

use once_cell::sync::OnceCell;

#[cfg(feature = "kv")]
use crate::config::AppContext;
use crate::error::Result;
use crate::logging::debug;

use super::TypedStore;

/// Holds the store handle of a component that must be initialized exactly once.
///
/// The first successful initialization wins: later calls return the same
/// handle and ignore their arguments, including the encryption flag. A failed
/// initialization leaves the cell empty so it can be retried.
///
/// # Example
///
/// ```ignore
/// use typed_prefs::{AppContext, StoreCell};
///
/// struct App {
///     prefs: StoreCell,
/// }
///
/// let app = App { prefs: StoreCell::new() };
/// let ctx = AppContext::new("com.example.notes", "/var/lib/notes");
/// let store = app.prefs.init(&ctx, true)?;
/// ```
#[derive(Debug, Default)]
pub struct StoreCell {
    store: OnceCell<TypedStore>,
}

impl StoreCell {
    pub const fn new() -> Self {
        Self {
            store: OnceCell::new(),
        }
    }

    /// Open the application's store on first call; return the existing handle afterwards.
    #[cfg(feature = "kv")]
    pub fn init(&self, ctx: &AppContext, encrypted: bool) -> Result<&TypedStore> {
        self.get_or_try_init(|| TypedStore::init(ctx, encrypted))
    }

    /// Initialize with `f` on first call; return the existing handle afterwards.
    pub fn get_or_try_init<F>(&self, f: F) -> Result<&TypedStore>
    where
        F: FnOnce() -> Result<TypedStore>,
    {
        if let Some(store) = self.store.get() {
            debug!("store already initialized");
            return Ok(store);
        }
        self.store.get_or_try_init(f)
    }

    /// The handle, if initialized.
    pub fn get(&self) -> Option<&TypedStore> {
        self.store.get()
    }
}
