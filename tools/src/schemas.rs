//! Registry listing.

use std::fmt::Write as _;

use schema::{LengthSource, MessageSchema, Registry, WireType};

/// Describes a wire type the way layouts read: `i32`, `bytes[16]`,
/// `bytes[dlen-4]`, `bytes[..]`.
pub fn describe_wire_type(wire_type: WireType) -> String {
    match wire_type {
        WireType::U8 => "u8".to_string(),
        WireType::U16 => "u16".to_string(),
        WireType::I32 => "i32".to_string(),
        WireType::I64 => "i64".to_string(),
        WireType::Fixed(size) => format!("bytes[{size}]"),
        WireType::Variable(LengthSource::Field { name, offset: 0 }) => format!("bytes[{name}]"),
        WireType::Variable(LengthSource::Field { name, offset }) => {
            format!("bytes[{name}-{offset}]")
        }
        WireType::Variable(LengthSource::Remaining) => "bytes[..]".to_string(),
    }
}

/// One line per field, frozen fields marked.
pub fn format_schema(schema: &MessageSchema) -> String {
    let mut out = format!("{}:\n", schema.name);
    for field in &schema.fields {
        let frozen = if field.mutable { "" } else { " (frozen)" };
        let _ = writeln!(
            out,
            "  {} {}{frozen}",
            field.name,
            describe_wire_type(field.wire_type)
        );
    }
    out
}

/// Formats every registered schema in name order.
pub fn format_registry(registry: &Registry) -> String {
    registry
        .schemas()
        .map(format_schema)
        .collect::<Vec<_>>()
        .join("\n")
}
