//! Data keys for key names and values, wrapped by the master key.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use aes_siv::siv::Aes256Siv;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;

use crate::backend::{Backend, BackendError, Mutation, StoredValue};
use crate::logging::{debug, info};

use super::error::CryptoError;
use super::keystore::MasterKey;

/// Namespace entry holding the wrapped key-name keyset.
pub const KEY_KEYSET_ENTRY: &str = "__typed_prefs_key_keyset__";

/// Namespace entry holding the wrapped value keyset.
pub const VALUE_KEYSET_ENTRY: &str = "__typed_prefs_value_keyset__";

/// AES-SIV with AES-256 needs a 512-bit key.
const SIV_KEY_SIZE: usize = 64;

const GCM_KEY_SIZE: usize = 32;

const GCM_NONCE_SIZE: usize = 12;

/// Deterministic cipher for key names.
pub(crate) struct KeyCipher {
    key: [u8; SIV_KEY_SIZE],
    header: Vec<u8>,
}

impl KeyCipher {
    fn new(key: [u8; SIV_KEY_SIZE], namespace: &str) -> Self {
        Self {
            key,
            header: namespace.as_bytes().to_vec(),
        }
    }

    fn cipher(&self) -> Result<Aes256Siv, CryptoError> {
        <Aes256Siv as aes_siv::aead::KeyInit>::new_from_slice(&self.key).map_err(|_| {
            CryptoError::InvalidKeyLength {
                expected: SIV_KEY_SIZE,
                actual: self.key.len(),
            }
        })
    }

    /// Encrypt a key name. Equal names always produce equal output.
    pub(crate) fn encrypt(&self, name: &str) -> Result<String, CryptoError> {
        let ciphertext = self
            .cipher()?
            .encrypt([self.header.as_slice()], name.as_bytes())
            .map_err(|_| CryptoError::Encrypt)?;
        Ok(STANDARD.encode(ciphertext))
    }

    pub(crate) fn decrypt(&self, encrypted: &str) -> Result<String, CryptoError> {
        let ciphertext = STANDARD.decode(encrypted)?;
        let plaintext = self
            .cipher()?
            .decrypt([self.header.as_slice()], &ciphertext)
            .map_err(|_| CryptoError::Decrypt)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::Decrypt)
    }
}

/// Randomized AEAD for values.
pub(crate) struct ValueCipher {
    cipher: Aes256Gcm,
}

impl ValueCipher {
    fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
            expected: GCM_KEY_SIZE,
            actual: key.len(),
        })?;
        Ok(Self { cipher })
    }

    /// Encrypt `plaintext` bound to `aad`. Output is base64 of `nonce || ciphertext`.
    pub(crate) fn seal(&self, plaintext: &[u8], aad: &[u8]) -> Result<String, CryptoError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, Payload { msg: plaintext, aad })
            .map_err(|_| CryptoError::Encrypt)?;

        let mut out = Vec::with_capacity(GCM_NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(out))
    }

    pub(crate) fn open(&self, sealed: &str, aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let bytes = STANDARD.decode(sealed)?;
        let (nonce, ciphertext) = bytes
            .split_at_checked(GCM_NONCE_SIZE)
            .ok_or(CryptoError::Decrypt)?;
        self.cipher
            .decrypt(Nonce::from_slice(nonce), Payload { msg: ciphertext, aad })
            .map_err(|_| CryptoError::Decrypt)
    }
}

/// The pair of data keys used by one encrypted namespace.
pub(crate) struct Keysets {
    pub(crate) keys: KeyCipher,
    pub(crate) values: ValueCipher,
}

impl Keysets {
    /// Unwrap the namespace keysets, generating and committing any that are missing.
    pub(crate) fn load_or_create<B: Backend + ?Sized>(
        inner: &B,
        master: &MasterKey,
        namespace: &str,
    ) -> Result<Self, CryptoError> {
        let wrapper = ValueCipher::new(master.as_bytes())?;

        let siv_key = load_or_create_key::<SIV_KEY_SIZE, B>(inner, &wrapper, KEY_KEYSET_ENTRY)?;
        let gcm_key = load_or_create_key::<GCM_KEY_SIZE, B>(inner, &wrapper, VALUE_KEYSET_ENTRY)?;

        Ok(Self {
            keys: KeyCipher::new(siv_key, namespace),
            values: ValueCipher::new(&gcm_key)?,
        })
    }
}

fn load_or_create_key<const N: usize, B: Backend + ?Sized>(
    inner: &B,
    wrapper: &ValueCipher,
    entry: &str,
) -> Result<[u8; N], CryptoError> {
    match inner.get(entry).map_err(backend_to_crypto)? {
        Some(StoredValue::String(sealed)) => {
            debug!(entry = entry, "unwrapping keyset");
            let bytes = wrapper.open(&sealed, entry.as_bytes())?;
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: N,
                    actual: bytes.len(),
                })
        }
        Some(_) => Err(CryptoError::KeysetCorrupt(entry.to_string())),
        None => {
            let mut key = [0u8; N];
            OsRng.fill_bytes(&mut key);
            let sealed = wrapper.seal(&key, entry.as_bytes())?;
            if !inner.commit(Mutation::put(entry, StoredValue::String(sealed))) {
                return Err(CryptoError::KeysetNotSaved(entry.to_string()));
            }
            info!(entry = entry, "generated keyset");
            Ok(key)
        }
    }
}

fn backend_to_crypto(err: BackendError) -> CryptoError {
    match err {
        BackendError::Crypto(e) => e,
        other => CryptoError::KeysetStorage(other.to_string()),
    }
}
