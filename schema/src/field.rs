//! Field specifications.

/// Where a variable-length field takes its byte count from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LengthSource {
    /// The decoded value of an earlier integer field, minus `offset`.
    Field {
        name: &'static str,
        offset: usize,
    },
    /// Every byte left in the buffer.
    Remaining,
}

/// The wire representation of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum WireType {
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Byte block of a fixed length.
    Fixed(usize),
    /// Byte block whose length is resolved at decode time.
    Variable(LengthSource),
}

impl WireType {
    /// Returns the encoded width for fixed-width types.
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Self::U8 => Some(1),
            Self::U16 => Some(2),
            Self::I32 => Some(4),
            Self::I64 => Some(8),
            Self::Fixed(size) => Some(size),
            Self::Variable(_) => None,
        }
    }

    /// Returns `true` for the integer types.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::U8 | Self::U16 | Self::I32 | Self::I64)
    }
}

/// One field in a message layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldSpec {
    pub name: &'static str,
    pub wire_type: WireType,
    /// Whether the fuzzer may replace this field's value.
    pub mutable: bool,
}

impl FieldSpec {
    /// Creates a mutable field.
    #[must_use]
    pub const fn new(name: &'static str, wire_type: WireType) -> Self {
        Self {
            name,
            wire_type,
            mutable: true,
        }
    }

    #[must_use]
    pub const fn u8(name: &'static str) -> Self {
        Self::new(name, WireType::U8)
    }

    #[must_use]
    pub const fn u16(name: &'static str) -> Self {
        Self::new(name, WireType::U16)
    }

    #[must_use]
    pub const fn i32(name: &'static str) -> Self {
        Self::new(name, WireType::I32)
    }

    #[must_use]
    pub const fn i64(name: &'static str) -> Self {
        Self::new(name, WireType::I64)
    }

    #[must_use]
    pub const fn fixed(name: &'static str, size: usize) -> Self {
        Self::new(name, WireType::Fixed(size))
    }

    /// Creates a variable block sized by the `dlen` field.
    #[must_use]
    pub const fn dlen_sized(name: &'static str) -> Self {
        Self::dlen_sized_minus(name, 0)
    }

    /// Creates a variable block sized by `dlen - offset`.
    #[must_use]
    pub const fn dlen_sized_minus(name: &'static str, offset: usize) -> Self {
        Self::new(
            name,
            WireType::Variable(LengthSource::Field {
                name: "dlen",
                offset,
            }),
        )
    }

    /// Creates a variable block that consumes the rest of the buffer.
    #[must_use]
    pub const fn remaining(name: &'static str) -> Self {
        Self::new(name, WireType::Variable(LengthSource::Remaining))
    }

    /// Marks the field as non-mutable.
    #[must_use]
    pub const fn frozen(mut self) -> Self {
        self.mutable = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_widths() {
        assert_eq!(WireType::U8.fixed_width(), Some(1));
        assert_eq!(WireType::U16.fixed_width(), Some(2));
        assert_eq!(WireType::I32.fixed_width(), Some(4));
        assert_eq!(WireType::I64.fixed_width(), Some(8));
        assert_eq!(WireType::Fixed(16).fixed_width(), Some(16));
        assert_eq!(WireType::Variable(LengthSource::Remaining).fixed_width(), None);
    }

    #[test]
    fn integer_types() {
        assert!(WireType::U16.is_integer());
        assert!(!WireType::Fixed(4).is_integer());
    }

    #[test]
    fn fields_default_to_mutable() {
        assert!(FieldSpec::u16("streamid").mutable);
        assert!(!FieldSpec::i32("dlen").frozen().mutable);
    }

    #[test]
    fn dlen_sized_minus_records_offset() {
        let field = FieldSpec::dlen_sized_minus("errmsg", 4);
        assert_eq!(
            field.wire_type,
            WireType::Variable(LengthSource::Field {
                name: "dlen",
                offset: 4
            })
        );
    }
}
