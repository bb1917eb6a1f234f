//! Readv chunk lists and responses.
//!
//! A `kXR_readv` request carries a list of 16-byte chunk headers in its
//! `data` block. The response repeats each header followed by that chunk's
//! bytes.

use schema::{MessageSchema, Registry, READ_LIST_SCHEMA};

use crate::decode::decode_fields;
use crate::encode::encode;
use crate::error::{CodecError, CodecResult};
use crate::value::{Value, Values};

/// Size of one encoded chunk header.
pub const READ_CHUNK_SIZE: usize = 16;

/// One entry of a readv chunk list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadChunk {
    pub fhandle: [u8; 4],
    pub len: i32,
    pub offset: i64,
}

/// A chunk header with the data the server returned for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadvSegment {
    pub chunk: ReadChunk,
    pub data: Vec<u8>,
}

impl ReadChunk {
    fn values(&self) -> Values {
        let mut values = Values::new();
        values.insert("fhandle".into(), Value::from(self.fhandle));
        values.insert("len".into(), Value::I32(self.len));
        values.insert("offset".into(), Value::I64(self.offset));
        values
    }

    fn from_values(schema: &MessageSchema, values: &Values) -> CodecResult<Self> {
        let fhandle = match values.get("fhandle") {
            Some(Value::Bytes(bytes)) if bytes.len() == 4 => {
                [bytes[0], bytes[1], bytes[2], bytes[3]]
            }
            _ => {
                return Err(CodecError::MissingValue {
                    schema: schema.name.clone(),
                    field: "fhandle".to_string(),
                })
            }
        };
        let len = match values.get("len") {
            Some(Value::I32(len)) => *len,
            _ => {
                return Err(CodecError::MissingValue {
                    schema: schema.name.clone(),
                    field: "len".to_string(),
                })
            }
        };
        let offset = match values.get("offset") {
            Some(Value::I64(offset)) => *offset,
            _ => {
                return Err(CodecError::MissingValue {
                    schema: schema.name.clone(),
                    field: "offset".to_string(),
                })
            }
        };
        Ok(Self {
            fhandle,
            len,
            offset,
        })
    }
}

/// Encodes a chunk list for the `data` block of a readv request.
pub fn encode_read_list(registry: &Registry, chunks: &[ReadChunk]) -> CodecResult<Vec<u8>> {
    let schema = registry.schema_for(READ_LIST_SCHEMA)?;
    let mut out = Vec::with_capacity(chunks.len() * READ_CHUNK_SIZE);
    for chunk in chunks {
        out.extend_from_slice(&encode(schema, &chunk.values())?);
    }
    Ok(out)
}

/// Decodes the `data` block of a readv request.
pub fn decode_read_list(registry: &Registry, raw: &[u8]) -> CodecResult<Vec<ReadChunk>> {
    if raw.len() % READ_CHUNK_SIZE != 0 {
        return Err(CodecError::InvalidReadList { len: raw.len() });
    }
    let schema = registry.schema_for(READ_LIST_SCHEMA)?;
    raw.chunks_exact(READ_CHUNK_SIZE)
        .map(|entry| {
            let (values, _) = decode_fields(schema, entry)?;
            ReadChunk::from_values(schema, &values)
        })
        .collect()
}

/// Encodes the body of a readv response.
///
/// Each segment's header is written with `len` set to the data actually sent.
pub fn encode_readv_response(
    registry: &Registry,
    segments: &[ReadvSegment],
) -> CodecResult<Vec<u8>> {
    let schema = registry.schema_for(READ_LIST_SCHEMA)?;
    let mut out = Vec::new();
    for segment in segments {
        let chunk = ReadChunk {
            len: i32::try_from(segment.data.len()).map_err(|_| CodecError::LengthMismatch {
                schema: schema.name.clone(),
                field: "len".to_string(),
                declared: i64::from(i32::MAX),
                actual: segment.data.len(),
            })?,
            ..segment.chunk
        };
        out.extend_from_slice(&encode(schema, &chunk.values())?);
        out.extend_from_slice(&segment.data);
    }
    Ok(out)
}

/// Decodes the body of a readv response into header and data segments.
pub fn decode_readv_response(registry: &Registry, raw: &[u8]) -> CodecResult<Vec<ReadvSegment>> {
    let schema = registry.schema_for(READ_LIST_SCHEMA)?;
    let mut segments = Vec::new();
    let mut rest = raw;
    while !rest.is_empty() {
        let (values, consumed) = decode_fields(schema, rest)?;
        let chunk = ReadChunk::from_values(schema, &values)?;
        rest = &rest[consumed..];
        let len = usize::try_from(chunk.len).map_err(|_| CodecError::NegativeLength {
            schema: schema.name.clone(),
            field: "len".to_string(),
            length: i64::from(chunk.len),
        })?;
        let data = rest.get(..len).ok_or_else(|| CodecError::Truncated {
            schema: schema.name.clone(),
            field: "data".to_string(),
            offset: raw.len() - rest.len(),
            expected: len,
            actual: rest.len(),
        })?;
        segments.push(ReadvSegment {
            chunk,
            data: data.to_vec(),
        });
        rest = &rest[len..];
    }
    Ok(segments)
}
