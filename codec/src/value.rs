//! Field values.

use std::collections::BTreeMap;

use schema::WireType;

/// A decoded or to-be-encoded field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Value {
    U8(u8),
    U16(u16),
    I32(i32),
    I64(i64),
    Bytes(Vec<u8>),
}

/// Field values keyed by field name.
pub type Values = BTreeMap<String, Value>;

impl Value {
    /// The all-zero value of `wire_type`; variable blocks start empty.
    #[must_use]
    pub fn zero(wire_type: WireType) -> Self {
        match wire_type {
            WireType::U8 => Self::U8(0),
            WireType::U16 => Self::U16(0),
            WireType::I32 => Self::I32(0),
            WireType::I64 => Self::I64(0),
            WireType::Fixed(size) => Self::Bytes(vec![0; size]),
            WireType::Variable(_) => Self::Bytes(Vec::new()),
        }
    }

    /// Returns the integer value widened to `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::U8(v) => Some(i64::from(*v)),
            Self::U16(v) => Some(i64::from(*v)),
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            Self::Bytes(_) => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::Bytes(_) => "bytes",
        }
    }

    /// Returns `true` if this value can be written as `wire_type`.
    ///
    /// Only the shape is checked here; fixed block lengths are checked by the encoder.
    #[must_use]
    pub const fn fits(&self, wire_type: WireType) -> bool {
        matches!(
            (self, wire_type),
            (Self::U8(_), WireType::U8)
                | (Self::U16(_), WireType::U16)
                | (Self::I32(_), WireType::I32)
                | (Self::I64(_), WireType::I64)
                | (Self::Bytes(_), WireType::Fixed(_) | WireType::Variable(_))
        )
    }

    /// Returns the number of bytes this value occupies on the wire.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::U8(_) => 1,
            Self::U16(_) => 2,
            Self::I32(_) => 4,
            Self::I64(_) => 8,
            Self::Bytes(bytes) => bytes.len(),
        }
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Self::U8(value)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Self::U16(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Value {
    fn from(value: [u8; N]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Bytes(value.as_bytes().to_vec())
    }
}

/// Pads or truncates `bytes` to exactly `len` bytes with trailing zeros.
#[must_use]
pub fn padded(bytes: &[u8], len: usize) -> Vec<u8> {
    let mut out = bytes[..bytes.len().min(len)].to_vec();
    out.resize(len, 0);
    out
}
