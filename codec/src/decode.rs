//! Schema-driven decoding of a single layout.

use bytestream::{ByteError, ByteReader};
use schema::{FieldSpec, LengthSource, MessageSchema, WireType};

use crate::error::{CodecError, CodecResult};
use crate::value::{Value, Values};

/// Decodes `raw` field by field according to `schema`.
///
/// Returns the decoded values and the number of bytes consumed. Variable
/// blocks are sized by `source - offset` where the source is an earlier
/// integer field, or by whatever remains of `raw`. Bytes past the last field
/// are left for the caller.
pub fn decode_fields(schema: &MessageSchema, raw: &[u8]) -> CodecResult<(Values, usize)> {
    let mut reader = ByteReader::new(raw);
    let mut values = Values::new();

    for field in &schema.fields {
        let offset = reader.position();
        let eof = |err: ByteError| truncated(schema, field, err);
        let value = match field.wire_type {
            WireType::U8 => Value::U8(reader.read_u8().map_err(eof)?),
            WireType::U16 => Value::U16(reader.read_u16().map_err(eof)?),
            WireType::I32 => Value::I32(reader.read_i32().map_err(eof)?),
            WireType::I64 => Value::I64(reader.read_i64().map_err(eof)?),
            WireType::Fixed(size) => {
                Value::Bytes(reader.read_bytes(size).map_err(eof)?.to_vec())
            }
            WireType::Variable(source) => {
                let len = match source {
                    LengthSource::Field { name, offset: sub } => {
                        variable_len(schema, field, &values, name, sub)?
                    }
                    LengthSource::Remaining => reader.remaining(),
                };
                Value::Bytes(reader.read_bytes(len).map_err(eof)?.to_vec())
            }
        };
        tracing::trace!(schema = %schema.name, field = field.name, offset, "decoded field");
        values.insert(field.name.to_string(), value);
    }

    Ok((values, reader.position()))
}

fn variable_len(
    schema: &MessageSchema,
    field: &FieldSpec,
    values: &Values,
    source: &str,
    offset: usize,
) -> CodecResult<usize> {
    let declared = values
        .get(source)
        .and_then(Value::as_i64)
        .ok_or_else(|| CodecError::MissingValue {
            schema: schema.name.clone(),
            field: source.to_string(),
        })?;
    let length = declared - i64::try_from(offset).unwrap_or(i64::MAX);
    usize::try_from(length).map_err(|_| CodecError::NegativeLength {
        schema: schema.name.clone(),
        field: field.name.to_string(),
        length,
    })
}

fn truncated(schema: &MessageSchema, field: &FieldSpec, err: ByteError) -> CodecError {
    let ByteError::UnexpectedEof {
        offset,
        requested,
        available,
    } = err;
    CodecError::Truncated {
        schema: schema.name.clone(),
        field: field.name.to_string(),
        offset,
        expected: requested,
        actual: available,
    }
}
