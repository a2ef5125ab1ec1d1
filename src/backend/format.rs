//! Binary entry format for byte-oriented namespaces.
//!
//! Layout: `[version: u8][kind tag: u8][payload]`. Numbers are little-endian,
//! strings are raw UTF-8, and string sets are a `u32` member count followed by
//! `u32`-length-prefixed members.

use std::collections::HashSet;

use super::error::BackendError;
use super::types::{StoredValue, ValueKind};

/// Current entry format version.
pub const FORMAT_VERSION: u8 = 1;

/// Encode a value into its binary entry form.
pub fn encode(value: &StoredValue) -> Result<Vec<u8>, BackendError> {
    let mut out = vec![FORMAT_VERSION, value.kind().tag()];
    match value {
        StoredValue::String(s) => out.extend_from_slice(s.as_bytes()),
        StoredValue::Bool(b) => out.push(u8::from(*b)),
        StoredValue::Int(i) => out.extend_from_slice(&i.to_le_bytes()),
        StoredValue::Long(l) => out.extend_from_slice(&l.to_le_bytes()),
        StoredValue::Float(f) => out.extend_from_slice(&f.to_bits().to_le_bytes()),
        StoredValue::StringSet(set) => {
            write_len(&mut out, set.len())?;
            for member in set {
                write_len(&mut out, member.len())?;
                out.extend_from_slice(member.as_bytes());
            }
        }
    }
    Ok(out)
}

/// Decode a binary entry.
pub fn decode(bytes: &[u8]) -> Result<StoredValue, BackendError> {
    let mut reader = Reader::new(bytes);

    let version = reader.byte()?;
    if version != FORMAT_VERSION {
        return Err(BackendError::Corrupt(format!(
            "unsupported entry format version {}",
            version
        )));
    }

    let tag = reader.byte()?;
    let kind = ValueKind::from_tag(tag)
        .ok_or_else(|| BackendError::Corrupt(format!("unknown kind tag {}", tag)))?;

    let value = match kind {
        ValueKind::String => StoredValue::String(utf8(reader.rest())?),
        ValueKind::Bool => match reader.byte()? {
            0 => StoredValue::Bool(false),
            1 => StoredValue::Bool(true),
            other => {
                return Err(BackendError::Corrupt(format!("invalid bool byte {}", other)));
            }
        },
        ValueKind::Int => StoredValue::Int(i32::from_le_bytes(reader.array()?)),
        ValueKind::Long => StoredValue::Long(i64::from_le_bytes(reader.array()?)),
        ValueKind::Float => StoredValue::Float(f32::from_bits(u32::from_le_bytes(reader.array()?))),
        ValueKind::StringSet => {
            let count = reader.read_len()?;
            let mut set = HashSet::with_capacity(count.min(1024));
            for _ in 0..count {
                let len = reader.read_len()?;
                set.insert(utf8(reader.take(len)?)?);
            }
            StoredValue::StringSet(set)
        }
    };

    if kind != ValueKind::String && !reader.rest().is_empty() {
        return Err(BackendError::Corrupt(format!(
            "trailing bytes after {} entry",
            kind
        )));
    }

    Ok(value)
}

fn write_len(out: &mut Vec<u8>, len: usize) -> Result<(), BackendError> {
    let len = u32::try_from(len)
        .map_err(|_| BackendError::Corrupt(format!("length {} exceeds u32", len)))?;
    out.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

fn utf8(bytes: &[u8]) -> Result<String, BackendError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| BackendError::Corrupt("invalid UTF-8 in string entry".to_string()))
}

/// Bounds-checked cursor over an entry.
struct Reader<'a> {
    remaining: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { remaining: bytes }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], BackendError> {
        let (head, tail) = self.remaining.split_at_checked(n).ok_or_else(|| {
            BackendError::Corrupt(format!(
                "truncated entry: need {} bytes, have {}",
                n,
                self.remaining.len()
            ))
        })?;
        self.remaining = tail;
        Ok(head)
    }

    fn byte(&mut self) -> Result<u8, BackendError> {
        let [b] = self.array::<1>()?;
        Ok(b)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BackendError> {
        let bytes = self.take(N)?;
        bytes
            .try_into()
            .map_err(|_| BackendError::Corrupt("truncated entry".to_string()))
    }

    fn read_len(&mut self) -> Result<usize, BackendError> {
        let len = u32::from_le_bytes(self.array()?);
        usize::try_from(len).map_err(|_| BackendError::Corrupt(format!("length {} too large", len)))
    }

    fn rest(&mut self) -> &'a [u8] {
        std::mem::take(&mut self.remaining)
    }
}
