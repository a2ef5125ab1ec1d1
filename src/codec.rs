//! JSON codec for structured values.
//!
//! Structured values are stored as JSON text in the string kind. Decoding
//! needs the target type from the caller, since JSON alone does not say which
//! Rust type a document came from.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Serialize `value` to JSON text.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Deserialize JSON text into a `T`.
pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}
