//! Schema-driven encoding.

use bytestream::ByteWriter;
use schema::{FieldSpec, LengthSource, MessageSchema, WireType};

use crate::error::{CodecError, CodecResult};
use crate::record::MessageRecord;
use crate::value::{Value, Values};

const DLEN_FIELD: &str = "dlen";

/// Encodes `values` according to `schema`.
///
/// `values` must supply exactly the schema's fields, by name. Fields are
/// written in schema order; variable blocks carry no length prefix of their
/// own. Length fields such as `dlen` are written as supplied, see
/// [`check_lengths`] and [`fill_lengths`].
pub fn encode(schema: &MessageSchema, values: &Values) -> CodecResult<Vec<u8>> {
    let unknown = values.keys().any(|name| schema.field(name).is_none());
    if values.len() != schema.len() || unknown {
        return Err(CodecError::ParameterMismatch {
            schema: schema.name.clone(),
            expected: schema.len(),
            actual: values.len(),
        });
    }

    let capacity = values.values().map(Value::encoded_len).sum();
    let mut writer = ByteWriter::with_capacity(capacity);
    for field in &schema.fields {
        let value = lookup(schema, values, field)?;
        write_field(schema, field, value, &mut writer)?;
    }
    Ok(writer.finish())
}

/// Encodes a record with the schema it carries.
pub fn encode_record(record: &MessageRecord) -> CodecResult<Vec<u8>> {
    encode(&record.schema, &record.values)
}

/// Encodes after verifying that every length field agrees with the data.
pub fn encode_checked(schema: &MessageSchema, values: &Values) -> CodecResult<Vec<u8>> {
    check_lengths(schema, values)?;
    encode(schema, values)
}

/// Verifies that each variable block holds exactly `source - offset` bytes.
pub fn check_lengths(schema: &MessageSchema, values: &Values) -> CodecResult<()> {
    for field in &schema.fields {
        let WireType::Variable(LengthSource::Field { name, offset }) = field.wire_type else {
            continue;
        };
        let declared = integer(schema, values, name)?
            .checked_sub(i64::try_from(offset).unwrap_or(i64::MAX))
            .unwrap_or(i64::MIN);
        let actual = bytes(schema, values, field)?.len();
        if i64::try_from(actual).ok() != Some(declared) {
            return Err(CodecError::LengthMismatch {
                schema: schema.name.clone(),
                field: field.name.to_string(),
                declared,
                actual,
            });
        }
    }
    Ok(())
}

/// Sets `dlen` and every other length-source field to the encoded size of
/// the fields after it.
///
/// `dlen` is filled even when no variable block refers to it, since it
/// frames the message. Other fields keep their values.
pub fn fill_lengths(schema: &MessageSchema, values: &mut Values) -> CodecResult<()> {
    let mut sources: Vec<&'static str> = schema
        .fields
        .iter()
        .filter_map(|field| match field.wire_type {
            WireType::Variable(LengthSource::Field { name, .. }) => Some(name),
            _ => None,
        })
        .collect();
    if let Some(dlen) = schema.field(DLEN_FIELD) {
        if dlen.wire_type.is_integer() && !sources.contains(&dlen.name) {
            sources.push(dlen.name);
        }
    }

    for source in sources {
        let Some(position) = schema.fields.iter().position(|f| f.name == source) else {
            continue;
        };
        let mut total = 0usize;
        for field in &schema.fields[position + 1..] {
            total += lookup(schema, values, field)?.encoded_len();
        }
        let spec = schema.fields[position];
        let length = i64::try_from(total).unwrap_or(i64::MAX);
        let value = match spec.wire_type {
            WireType::U8 => Value::U8(u8::try_from(length).unwrap_or(u8::MAX)),
            WireType::U16 => Value::U16(u16::try_from(length).unwrap_or(u16::MAX)),
            WireType::I32 => Value::I32(i32::try_from(length).unwrap_or(i32::MAX)),
            WireType::I64 => Value::I64(length),
            WireType::Fixed(_) | WireType::Variable(_) => continue,
        };
        values.insert(source.to_string(), value);
    }
    Ok(())
}

fn lookup<'v>(
    schema: &MessageSchema,
    values: &'v Values,
    field: &FieldSpec,
) -> CodecResult<&'v Value> {
    values
        .get(field.name)
        .ok_or_else(|| CodecError::MissingValue {
            schema: schema.name.clone(),
            field: field.name.to_string(),
        })
}

fn integer(schema: &MessageSchema, values: &Values, name: &str) -> CodecResult<i64> {
    let value = values.get(name).ok_or_else(|| CodecError::MissingValue {
        schema: schema.name.clone(),
        field: name.to_string(),
    })?;
    value.as_i64().ok_or_else(|| CodecError::TypeMismatch {
        schema: schema.name.clone(),
        field: name.to_string(),
        found: value.kind_name(),
    })
}

fn bytes<'v>(
    schema: &MessageSchema,
    values: &'v Values,
    field: &FieldSpec,
) -> CodecResult<&'v [u8]> {
    let value = lookup(schema, values, field)?;
    value.as_bytes().ok_or_else(|| CodecError::TypeMismatch {
        schema: schema.name.clone(),
        field: field.name.to_string(),
        found: value.kind_name(),
    })
}

fn write_field(
    schema: &MessageSchema,
    field: &FieldSpec,
    value: &Value,
    writer: &mut ByteWriter,
) -> CodecResult<()> {
    match (field.wire_type, value) {
        (WireType::U8, Value::U8(v)) => writer.write_u8(*v),
        (WireType::U16, Value::U16(v)) => writer.write_u16(*v),
        (WireType::I32, Value::I32(v)) => writer.write_i32(*v),
        (WireType::I64, Value::I64(v)) => writer.write_i64(*v),
        (WireType::Fixed(size), Value::Bytes(bytes)) => {
            if bytes.len() != size {
                return Err(CodecError::FixedSizeMismatch {
                    schema: schema.name.clone(),
                    field: field.name.to_string(),
                    expected: size,
                    actual: bytes.len(),
                });
            }
            writer.write_bytes(bytes);
        }
        (WireType::Variable(_), Value::Bytes(bytes)) => writer.write_bytes(bytes),
        (_, other) => {
            return Err(CodecError::TypeMismatch {
                schema: schema.name.clone(),
                field: field.name.to_string(),
                found: other.kind_name(),
            });
        }
    }
    Ok(())
}
