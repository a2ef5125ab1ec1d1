//! Mapping between Rust types and stored value kinds.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::{StoredValue, ValueKind};
use crate::codec;
use crate::error::{Error, Result};

/// A Rust type that can be stored under a key.
///
/// Implemented for `String`, `bool`, `i32`, `i64`, `f32`, `f64`, string sets
/// and [`Json<T>`] for anything serde can handle.
pub trait Preference: Sized {
    /// The kind this type is stored as.
    const KIND: ValueKind;

    /// Convert into the stored representation.
    fn into_stored(self) -> Result<StoredValue>;

    /// Convert back from the stored representation.
    ///
    /// `Ok(None)` means the entry counts as absent and the caller's default
    /// should be used instead.
    fn from_stored(key: &str, stored: StoredValue) -> Result<Option<Self>>;
}

fn mismatch<T>(key: &str, expected: ValueKind, stored: &StoredValue) -> Result<T> {
    Err(Error::type_mismatch(key, expected, stored.kind()))
}

impl Preference for String {
    const KIND: ValueKind = ValueKind::String;

    fn into_stored(self) -> Result<StoredValue> {
        Ok(StoredValue::String(self))
    }

    fn from_stored(key: &str, stored: StoredValue) -> Result<Option<Self>> {
        match stored {
            StoredValue::String(s) => Ok(Some(s)),
            other => mismatch(key, Self::KIND, &other),
        }
    }
}

impl Preference for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn into_stored(self) -> Result<StoredValue> {
        Ok(StoredValue::Bool(self))
    }

    fn from_stored(key: &str, stored: StoredValue) -> Result<Option<Self>> {
        match stored {
            StoredValue::Bool(b) => Ok(Some(b)),
            other => mismatch(key, Self::KIND, &other),
        }
    }
}

impl Preference for i32 {
    const KIND: ValueKind = ValueKind::Int;

    fn into_stored(self) -> Result<StoredValue> {
        Ok(StoredValue::Int(self))
    }

    fn from_stored(key: &str, stored: StoredValue) -> Result<Option<Self>> {
        match stored {
            StoredValue::Int(i) => Ok(Some(i)),
            other => mismatch(key, Self::KIND, &other),
        }
    }
}

impl Preference for i64 {
    const KIND: ValueKind = ValueKind::Long;

    fn into_stored(self) -> Result<StoredValue> {
        Ok(StoredValue::Long(self))
    }

    fn from_stored(key: &str, stored: StoredValue) -> Result<Option<Self>> {
        match stored {
            StoredValue::Long(l) => Ok(Some(l)),
            other => mismatch(key, Self::KIND, &other),
        }
    }
}

impl Preference for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn into_stored(self) -> Result<StoredValue> {
        Ok(StoredValue::Float(self))
    }

    fn from_stored(key: &str, stored: StoredValue) -> Result<Option<Self>> {
        match stored {
            StoredValue::Float(f) => Ok(Some(f)),
            other => mismatch(key, Self::KIND, &other),
        }
    }
}

/// Doubles are stored as the long kind holding their exact bit pattern.
impl Preference for f64 {
    const KIND: ValueKind = ValueKind::Long;

    fn into_stored(self) -> Result<StoredValue> {
        Ok(StoredValue::Long(self.to_bits() as i64))
    }

    fn from_stored(key: &str, stored: StoredValue) -> Result<Option<Self>> {
        match stored {
            StoredValue::Long(bits) => Ok(Some(f64::from_bits(bits as u64))),
            other => mismatch(key, Self::KIND, &other),
        }
    }
}

impl Preference for HashSet<String> {
    const KIND: ValueKind = ValueKind::StringSet;

    fn into_stored(self) -> Result<StoredValue> {
        Ok(StoredValue::StringSet(self))
    }

    fn from_stored(key: &str, stored: StoredValue) -> Result<Option<Self>> {
        match stored {
            StoredValue::StringSet(set) => Ok(Some(set)),
            other => mismatch(key, Self::KIND, &other),
        }
    }
}

impl Preference for BTreeSet<String> {
    const KIND: ValueKind = ValueKind::StringSet;

    fn into_stored(self) -> Result<StoredValue> {
        Ok(StoredValue::StringSet(self.into_iter().collect()))
    }

    fn from_stored(key: &str, stored: StoredValue) -> Result<Option<Self>> {
        match stored {
            StoredValue::StringSet(set) => Ok(Some(set.into_iter().collect())),
            other => mismatch(key, Self::KIND, &other),
        }
    }
}

/// A structured value stored as JSON text.
///
/// The wrapped type is the type descriptor used to decode the stored text.
/// An empty stored string reads as absent, so `get` returns the default for
/// it just as it does for a missing key.
///
/// # Example
///
/// ```ignore
/// use typed_prefs::Json;
///
/// store.put("recent", Json(vec!["a.txt".to_string()]))?;
/// let Json(recent) = store.get("recent", Json(Vec::<String>::new()))?;
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize + DeserializeOwned> Preference for Json<T> {
    const KIND: ValueKind = ValueKind::String;

    fn into_stored(self) -> Result<StoredValue> {
        Ok(StoredValue::String(codec::encode(&self.0)?))
    }

    fn from_stored(key: &str, stored: StoredValue) -> Result<Option<Self>> {
        match stored {
            StoredValue::String(json) if json.is_empty() => Ok(None),
            StoredValue::String(json) => Ok(Some(Json(codec::decode(&json)?))),
            other => mismatch(key, Self::KIND, &other),
        }
    }
}
