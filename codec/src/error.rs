//! Error types for codec operations.

use std::fmt;

use schema::SchemaError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding messages.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// Wire framing error.
    Wire(wire::DecodeError),

    /// Unknown schema, code or name.
    Schema(SchemaError),

    /// The supplied values do not cover exactly the schema's fields.
    ParameterMismatch {
        schema: String,
        expected: usize,
        actual: usize,
    },

    /// A schema field has no value.
    MissingValue { schema: String, field: String },

    /// A value's type does not match its field's wire type.
    TypeMismatch {
        schema: String,
        field: String,
        found: &'static str,
    },

    /// A fixed-size block has the wrong length.
    FixedSizeMismatch {
        schema: String,
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A variable block's length disagrees with its length source.
    LengthMismatch {
        schema: String,
        field: String,
        declared: i64,
        actual: usize,
    },

    /// A variable block's computed length is negative.
    NegativeLength {
        schema: String,
        field: String,
        length: i64,
    },

    /// Input ended before a field could be read.
    Truncated {
        schema: String,
        field: String,
        offset: usize,
        expected: usize,
        actual: usize,
    },

    /// The schema consumed fewer bytes than the message declares.
    TrailingData {
        schema: String,
        declared: usize,
        decoded: usize,
    },

    /// Asynchronous responses nested deeper than allowed.
    NestingTooDeep { depth: usize },

    /// A readv chunk list is not a whole number of chunk headers.
    InvalidReadList { len: usize },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(err) => write!(f, "wire error: {err}"),
            Self::Schema(err) => write!(f, "schema error: {err}"),
            Self::ParameterMismatch {
                schema,
                expected,
                actual,
            } => write!(
                f,
                "parameters for {schema} do not match its fields: expected {expected}, got {actual}"
            ),
            Self::MissingValue { schema, field } => {
                write!(f, "no value for field {field} of {schema}")
            }
            Self::TypeMismatch {
                schema,
                field,
                found,
            } => write!(f, "field {field} of {schema} cannot hold a {found} value"),
            Self::FixedSizeMismatch {
                schema,
                field,
                expected,
                actual,
            } => write!(
                f,
                "field {field} of {schema} must be {expected} bytes, got {actual}"
            ),
            Self::LengthMismatch {
                schema,
                field,
                declared,
                actual,
            } => write!(
                f,
                "field {field} of {schema} declares {declared} bytes but holds {actual}"
            ),
            Self::NegativeLength {
                schema,
                field,
                length,
            } => write!(f, "field {field} of {schema} has negative length {length}"),
            Self::Truncated {
                schema,
                field,
                offset,
                expected,
                actual,
            } => write!(
                f,
                "truncated {schema} at field {field} (offset {offset}): need {expected} bytes, have {actual}"
            ),
            Self::TrailingData {
                schema,
                declared,
                decoded,
            } => write!(
                f,
                "{schema} declares {declared} bytes but its layout covers {decoded}"
            ),
            Self::NestingTooDeep { depth } => {
                write!(f, "asynchronous responses nested {depth} levels deep")
            }
            Self::InvalidReadList { len } => {
                write!(f, "readv chunk list of {len} bytes is not a multiple of 16")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(err) => Some(err),
            Self::Schema(err) => Some(err),
            _ => None,
        }
    }
}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<SchemaError> for CodecError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}
