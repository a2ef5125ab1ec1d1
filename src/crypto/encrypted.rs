//! Encrypting view over a namespace.

use crate::backend::{Backend, BackendError, Mutation, StoredValue, format};
use crate::logging::{debug, warn};

use super::error::CryptoError;
use super::keyset::{KEY_KEYSET_ENTRY, Keysets, VALUE_KEYSET_ENTRY};
use super::keystore::MasterKeyStore;

/// A [`Backend`] that stores only encrypted key names and values in `inner`.
///
/// Every value, whatever its kind, reaches `inner` as a
/// [`StoredValue::String`] holding base64 AES-GCM ciphertext of its
/// [`format`] encoding. Reads decrypt and decode it back to the original kind.
///
/// # Example
///
/// ```ignore
/// use typed_prefs::backend::MemoryBackend;
/// use typed_prefs::crypto::{EncryptedBackend, FileKeyStore, DEFAULT_MASTER_KEY_ALIAS};
///
/// let keys = FileKeyStore::new("/data/app/.keystore");
/// let backend = EncryptedBackend::open(
///     MemoryBackend::new(),
///     &keys,
///     DEFAULT_MASTER_KEY_ALIAS,
///     "com.example-prefs",
/// )?;
/// ```
pub struct EncryptedBackend<B> {
    inner: B,
    keysets: Keysets,
}

impl<B: Backend> EncryptedBackend<B> {
    /// Wrap `inner`, loading the master key `alias` from `key_store`.
    ///
    /// On first use this generates the master key (if the key store has none)
    /// and the namespace keysets, committing the wrapped keysets to `inner`.
    pub fn open(
        inner: B,
        key_store: &dyn MasterKeyStore,
        alias: &str,
        namespace: &str,
    ) -> Result<Self, CryptoError> {
        debug!(namespace = namespace, alias = alias, "opening encrypted namespace");
        let master = key_store.load_or_create(alias)?;
        let keysets = Keysets::load_or_create(&inner, &master, namespace)?;
        Ok(Self { inner, keysets })
    }

    /// The underlying namespace, as stored.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// The name `key` is stored under in the underlying namespace.
    pub fn encrypted_key(&self, key: &str) -> Result<String, CryptoError> {
        self.keysets.keys.encrypt(key)
    }

    fn seal(&self, mutation: Mutation) -> Result<Mutation, BackendError> {
        match mutation {
            Mutation::Put { key, value } => {
                let encrypted_key = self.keysets.keys.encrypt(&key)?;
                let plaintext = format::encode(&value)?;
                let sealed = self
                    .keysets
                    .values
                    .seal(&plaintext, encrypted_key.as_bytes())?;
                Ok(Mutation::put(encrypted_key, StoredValue::String(sealed)))
            }
            Mutation::Remove { key } => Ok(Mutation::remove(self.keysets.keys.encrypt(&key)?)),
        }
    }
}

fn is_keyset_entry(key: &str) -> bool {
    key == KEY_KEYSET_ENTRY || key == VALUE_KEYSET_ENTRY
}

impl<B: Backend> Backend for EncryptedBackend<B> {
    fn get(&self, key: &str) -> Result<Option<StoredValue>, BackendError> {
        let encrypted_key = self.keysets.keys.encrypt(key)?;
        match self.inner.get(&encrypted_key)? {
            Some(StoredValue::String(sealed)) => {
                let plaintext = self
                    .keysets
                    .values
                    .open(&sealed, encrypted_key.as_bytes())?;
                Ok(Some(format::decode(&plaintext)?))
            }
            Some(other) => Err(BackendError::Corrupt(format!(
                "encrypted entry for '{}' holds a {} instead of ciphertext",
                key,
                other.kind()
            ))),
            None => Ok(None),
        }
    }

    fn contains(&self, key: &str) -> Result<bool, BackendError> {
        let encrypted_key = self.keysets.keys.encrypt(key)?;
        self.inner.contains(&encrypted_key)
    }

    fn apply(&self, mutation: Mutation) -> Result<(), BackendError> {
        let sealed = self.seal(mutation)?;
        self.inner.apply(sealed)
    }

    fn commit(&self, mutation: Mutation) -> bool {
        let key = mutation.key().to_string();
        match self.seal(mutation) {
            Ok(sealed) => self.inner.commit(sealed),
            Err(e) => {
                warn!(key = %key, error = %e, "could not encrypt entry for commit");
                false
            }
        }
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        self.inner
            .keys()?
            .into_iter()
            .filter(|k| !is_keyset_entry(k))
            .map(|k| Ok(self.keysets.keys.decrypt(&k)?))
            .collect()
    }
}
