//! Data types shared by all backends.

use std::collections::HashSet;
use std::fmt;

/// A value as held by a namespace.
///
/// There is no 64-bit float kind: doubles are stored as [`StoredValue::Long`]
/// holding their raw bit pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    String(String),
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    StringSet(HashSet<String>),
}

impl StoredValue {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Long(_) => ValueKind::Long,
            Self::Float(_) => ValueKind::Float,
            Self::StringSet(_) => ValueKind::StringSet,
        }
    }
}

/// The concrete kind a key currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Bool,
    Int,
    Long,
    Float,
    StringSet,
}

impl ValueKind {
    /// Tag byte used by the binary entry format.
    pub const fn tag(self) -> u8 {
        match self {
            Self::String => 1,
            Self::Bool => 2,
            Self::Int => 3,
            Self::Long => 4,
            Self::Float => 5,
            Self::StringSet => 6,
        }
    }

    /// Inverse of [`tag`](Self::tag).
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::String),
            2 => Some(Self::Bool),
            3 => Some(Self::Int),
            4 => Some(Self::Long),
            5 => Some(Self::Float),
            6 => Some(Self::StringSet),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::StringSet => "string-set",
        };
        f.write_str(name)
    }
}

/// A single-key write.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Put { key: String, value: StoredValue },
    Remove { key: String },
}

impl Mutation {
    pub fn put(key: impl Into<String>, value: StoredValue) -> Self {
        Self::Put {
            key: key.into(),
            value,
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove { key: key.into() }
    }

    /// The key this mutation touches.
    pub fn key(&self) -> &str {
        match self {
            Self::Put { key, .. } | Self::Remove { key } => key,
        }
    }
}
