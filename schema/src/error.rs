//! Schema lookup and validation errors.

use std::fmt;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Which code table a lookup failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeTable {
    Request,
    Status,
    Action,
    Error,
}

/// Errors that can occur when building, validating or querying schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// No schema is registered under this name.
    UnknownSchema { name: String },

    /// A numeric code has no entry in its table.
    UnknownCode { table: CodeTable, code: i64 },

    /// A symbolic name has no entry in its table.
    UnknownName { table: CodeTable, name: String },

    /// Two fields in one schema share a name.
    DuplicateField { schema: String, field: &'static str },

    /// A variable field names a length source that is not an earlier field.
    LengthSourceNotEarlier {
        schema: String,
        field: &'static str,
        source: &'static str,
    },

    /// A variable field names a length source that is not an integer.
    InvalidLengthSource {
        schema: String,
        field: &'static str,
        source: &'static str,
    },

    /// Fixed-size blocks must be at least one byte.
    InvalidFixedSize { schema: String, field: &'static str },
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Request => "request",
            Self::Status => "response status",
            Self::Action => "action",
            Self::Error => "error",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSchema { name } => write!(f, "unknown schema: {name}"),
            Self::UnknownCode { table, code } => write!(f, "unknown {table} code: {code}"),
            Self::UnknownName { table, name } => write!(f, "unknown {table} name: {name}"),
            Self::DuplicateField { schema, field } => {
                write!(f, "duplicate field {field} in schema {schema}")
            }
            Self::LengthSourceNotEarlier {
                schema,
                field,
                source,
            } => write!(
                f,
                "field {field} in schema {schema} takes its length from {source}, which does not precede it"
            ),
            Self::InvalidLengthSource {
                schema,
                field,
                source,
            } => write!(
                f,
                "field {field} in schema {schema} takes its length from non-integer field {source}"
            ),
            Self::InvalidFixedSize { schema, field } => {
                write!(f, "fixed field {field} in schema {schema} has zero size")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_code_display() {
        let err = SchemaError::UnknownCode {
            table: CodeTable::Action,
            code: 9999,
        };
        assert_eq!(err.to_string(), "unknown action code: 9999");
    }

    #[test]
    fn unknown_name_display() {
        let err = SchemaError::UnknownName {
            table: CodeTable::Request,
            name: "kXR_bogus".to_string(),
        };
        assert!(err.to_string().contains("kXR_bogus"));
    }

    #[test]
    fn length_source_display_names_both_fields() {
        let err = SchemaError::LengthSourceNotEarlier {
            schema: "login_request".to_string(),
            field: "token",
            source: "dlen",
        };
        let msg = err.to_string();
        assert!(msg.contains("token"));
        assert!(msg.contains("dlen"));
        assert!(msg.contains("login_request"));
    }
}
