//! Master key storage.

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::RngCore;
use rand::rngs::OsRng;

use crate::logging::{debug, info};

use super::error::CryptoError;

/// Alias under which the default master key is kept.
pub const DEFAULT_MASTER_KEY_ALIAS: &str = "_typed_prefs_master_key_";

/// Master key size in bytes (AES-256-GCM).
pub const MASTER_KEY_SIZE: usize = 32;

/// A 256-bit AES-GCM key that wraps the namespace keysets.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey([u8; MASTER_KEY_SIZE]);

impl MasterKey {
    /// Generate a fresh key from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; MASTER_KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key: [u8; MASTER_KEY_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: MASTER_KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

/// Secure storage for master keys, addressed by alias.
pub trait MasterKeyStore: Send + Sync {
    /// Return the key stored under `alias`, generating and storing it on first use.
    fn load_or_create(&self, alias: &str) -> Result<MasterKey, CryptoError>;
}

/// Keeps one key file per alias in a private directory.
///
/// Key files are created exclusively and, on unix, readable only by the owner.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    dir: PathBuf,
}

impl FileKeyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the key file for `alias`.
    pub fn key_path(&self, alias: &str) -> PathBuf {
        self.dir.join(format!("{}.key", alias))
    }

    fn read_key(path: &Path) -> Result<MasterKey, CryptoError> {
        let bytes = fs::read(path)?;
        MasterKey::from_slice(&bytes)
    }

    fn create_key(&self, path: &Path) -> Result<Option<MasterKey>, CryptoError> {
        fs::create_dir_all(&self.dir)?;

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = match options.open(path) {
            Ok(file) => file,
            // Someone else generated it first; use theirs.
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let key = MasterKey::generate();
        file.write_all(key.as_bytes())?;
        file.sync_all()?;
        Ok(Some(key))
    }
}

impl MasterKeyStore for FileKeyStore {
    fn load_or_create(&self, alias: &str) -> Result<MasterKey, CryptoError> {
        let path = self.key_path(alias);
        if path.exists() {
            debug!(alias = alias, "loading master key");
            return Self::read_key(&path);
        }

        match self.create_key(&path)? {
            Some(key) => {
                info!(alias = alias, path = %path.display(), "generated master key");
                Ok(key)
            }
            None => Self::read_key(&path),
        }
    }
}

/// Keeps keys in memory and counts how many it generated.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    keys: Mutex<HashMap<String, MasterKey>>,
    generated: AtomicUsize,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many keys this store has generated so far.
    pub fn generated(&self) -> usize {
        self.generated.load(Ordering::SeqCst)
    }
}

impl MasterKeyStore for MemoryKeyStore {
    fn load_or_create(&self, alias: &str) -> Result<MasterKey, CryptoError> {
        let mut keys = self.keys.lock().map_err(|_| CryptoError::Poisoned)?;
        let key = keys.entry(alias.to_string()).or_insert_with(|| {
            self.generated.fetch_add(1, Ordering::SeqCst);
            MasterKey::generate()
        });
        Ok(key.clone())
    }
}

impl<S: MasterKeyStore + ?Sized> MasterKeyStore for std::sync::Arc<S> {
    fn load_or_create(&self, alias: &str) -> Result<MasterKey, CryptoError> {
        (**self).load_or_create(alias)
    }
}
