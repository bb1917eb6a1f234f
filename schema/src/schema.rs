//! Message schema definitions and validation.

use std::collections::HashSet;

use crate::error::{SchemaError, SchemaResult};
use crate::field::{FieldSpec, LengthSource, WireType};

/// An ordered list of fields describing one message layout.
///
/// Registered schemas are immutable; per-message variants (such as an open
/// response without its optional fields) are produced as filtered copies.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MessageSchema {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl MessageSchema {
    /// Creates a schema after validation.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> SchemaResult<Self> {
        let schema = Self {
            name: name.into(),
            fields,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Creates a schema by concatenating field slices.
    pub fn from_parts(name: impl Into<String>, parts: &[&[FieldSpec]]) -> SchemaResult<Self> {
        let fields = parts.iter().flat_map(|part| part.iter().copied()).collect();
        Self::new(name, fields)
    }

    /// Validates schema invariants.
    pub fn validate(&self) -> SchemaResult<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            match field.wire_type {
                WireType::Fixed(0) => {
                    return Err(SchemaError::InvalidFixedSize {
                        schema: self.name.clone(),
                        field: field.name,
                    });
                }
                WireType::Variable(LengthSource::Field { name: source, .. }) => {
                    if !seen.contains(source) {
                        return Err(SchemaError::LengthSourceNotEarlier {
                            schema: self.name.clone(),
                            field: field.name,
                            source,
                        });
                    }
                    let is_integer = self
                        .field(source)
                        .is_some_and(|spec| spec.wire_type.is_integer());
                    if !is_integer {
                        return Err(SchemaError::InvalidLengthSource {
                            schema: self.name.clone(),
                            field: field.name,
                            source,
                        });
                    }
                }
                _ => {}
            }
            if !seen.insert(field.name) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name,
                });
            }
        }
        Ok(())
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns `true` if the schema has a field with this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over field names in wire order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    /// Returns the encoded size when every field is fixed-width.
    #[must_use]
    pub fn fixed_len(&self) -> Option<usize> {
        self.fields
            .iter()
            .map(|field| field.wire_type.fixed_width())
            .sum()
    }

    /// Returns a copy without the named fields.
    #[must_use]
    pub fn without(&self, names: &[&str]) -> Self {
        Self {
            name: self.name.clone(),
            fields: self
                .fields
                .iter()
                .filter(|field| !names.contains(&field.name))
                .copied()
                .collect(),
        }
    }

    /// Returns a copy with one more field appended.
    pub fn with_field(&self, field: FieldSpec) -> SchemaResult<Self> {
        let mut fields = self.fields.clone();
        fields.push(field);
        Self::new(self.name.clone(), fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_schema() -> MessageSchema {
        MessageSchema::new(
            "rm_request",
            vec![
                FieldSpec::u16("streamid"),
                FieldSpec::u16("requestid").frozen(),
                FieldSpec::fixed("reserved", 16),
                FieldSpec::i32("dlen").frozen(),
                FieldSpec::dlen_sized("path"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn schema_lookup_by_name() {
        let schema = path_schema();
        assert_eq!(schema.len(), 5);
        assert!(schema.contains("reserved"));
        assert!(!schema.contains("fhandle"));
        assert_eq!(schema.field("dlen").unwrap().wire_type, WireType::I32);
    }

    #[test]
    fn schema_fixed_len() {
        let schema = path_schema();
        assert_eq!(schema.fixed_len(), None);
        assert_eq!(schema.without(&["path"]).fixed_len(), Some(24));
    }

    #[test]
    fn schema_rejects_duplicate_fields() {
        let err = MessageSchema::new("dup", vec![FieldSpec::u16("a"), FieldSpec::i32("a")])
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { field: "a", .. }));
    }

    #[test]
    fn schema_rejects_length_source_after_field() {
        let err = MessageSchema::new(
            "bad",
            vec![FieldSpec::dlen_sized("path"), FieldSpec::i32("dlen")],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::LengthSourceNotEarlier { .. }));
    }

    #[test]
    fn schema_rejects_self_referencing_length() {
        let field = FieldSpec::new(
            "blob",
            WireType::Variable(LengthSource::Field {
                name: "blob",
                offset: 0,
            }),
        );
        let err = MessageSchema::new("bad", vec![field]).unwrap_err();
        assert!(matches!(err, SchemaError::LengthSourceNotEarlier { .. }));
    }

    #[test]
    fn schema_rejects_non_integer_length_source() {
        let err = MessageSchema::new(
            "bad",
            vec![FieldSpec::fixed("dlen", 4), FieldSpec::dlen_sized("path")],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidLengthSource { .. }));
    }

    #[test]
    fn schema_rejects_zero_fixed_size() {
        let err = MessageSchema::new("bad", vec![FieldSpec::fixed("x", 0)]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFixedSize { .. }));
    }

    #[test]
    fn from_parts_concatenates() {
        let header = [FieldSpec::u16("streamid"), FieldSpec::u16("status")];
        let body = [FieldSpec::i32("dlen")];
        let schema = MessageSchema::from_parts("resp", &[&header, &body]).unwrap();
        assert_eq!(
            schema.field_names().collect::<Vec<_>>(),
            vec!["streamid", "status", "dlen"]
        );
    }

    #[test]
    fn with_field_validates() {
        let schema = path_schema();
        assert!(schema.with_field(FieldSpec::u8("path")).is_err());
        assert_eq!(schema.with_field(FieldSpec::u8("extra")).unwrap().len(), 6);
    }
}
