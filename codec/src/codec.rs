//! Message-level encode and decode entry points.

use schema::{
    ActionCode, CodeTable, FieldSpec, MessageSchema, OpenOptions, Registry, RequestKind,
    ResponseStatus, SchemaError, RESPONSE_HEADER_SCHEMA,
};
use wire::{Limits, ResponseHeader, HANDSHAKE_SIZE, REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE};

use crate::attn::{action_code, attn_schema, EMBEDDED_RESPONSE_OFFSET};
use crate::decode::decode_fields;
use crate::encode::encode;
use crate::error::{CodecError, CodecResult};
use crate::open::open_response_schema;
use crate::record::{MessageKind, MessageRecord};
use crate::value::Values;

/// Name of the opaque field that captures bodies with no layout.
pub const PAYLOAD_FIELD: &str = "payload";

/// Maximum depth of `kXR_asynresp` wrappers decoded recursively.
pub const MAX_NESTING: usize = 8;

/// How to interpret the bytes passed to [`Codec::decode`].
#[derive(Debug, Clone, Copy)]
pub enum DecodeHint<'a> {
    /// Bytes sent by a client.
    Request,
    /// Bytes sent by a server in answer to this request.
    ResponseTo(&'a MessageRecord),
}

/// A decoded message and the number of bytes it occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub record: MessageRecord,
    pub consumed: usize,
}

/// Encoder and decoder bound to a schema registry.
#[derive(Debug, Clone)]
pub struct Codec<'r> {
    registry: &'r Registry,
    limits: Limits,
}

impl<'r> Codec<'r> {
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_limits(registry, Limits::default())
    }

    #[must_use]
    pub const fn with_limits(registry: &'r Registry, limits: Limits) -> Self {
        Self { registry, limits }
    }

    #[must_use]
    pub const fn registry(&self) -> &'r Registry {
        self.registry
    }

    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Encodes `values` with the named schema.
    pub fn encode(&self, schema_name: &str, values: &Values) -> CodecResult<Vec<u8>> {
        encode(self.registry.schema_for(schema_name)?, values)
    }

    /// Decodes one message from the start of `raw`.
    pub fn decode(&self, raw: &[u8], hint: DecodeHint<'_>) -> CodecResult<Decoded> {
        match hint {
            DecodeHint::Request => self.decode_request(raw),
            DecodeHint::ResponseTo(request) => self.decode_response(raw, request),
        }
    }

    /// Decodes the first request in `raw`.
    ///
    /// Bytes beyond the request's declared length are not consumed; they are
    /// either a piggybacked request or garbage for the caller to handle.
    pub fn decode_request(&self, raw: &[u8]) -> CodecResult<Decoded> {
        let requestid = peek_u16(raw, 2, "request_header", "requestid")?;
        let kind = RequestKind::from_code(requestid)?;
        let base = self.registry.request_schema(kind)?;

        if kind == RequestKind::Handshake {
            let frame = raw.get(..HANDSHAKE_SIZE).unwrap_or(raw);
            let (values, consumed) = decode_fields(base, frame)?;
            return Ok(Decoded {
                record: MessageRecord {
                    kind: MessageKind::Request(kind),
                    schema: base.clone(),
                    values,
                    nested: None,
                },
                consumed,
            });
        }

        let header = wire::RequestHeader::decode(raw).map_err(|err| match err {
            wire::DecodeError::MessageTooSmall { actual, required } => CodecError::Truncated {
                schema: base.name.clone(),
                field: "dlen".to_string(),
                offset: 0,
                expected: required,
                actual,
            },
            other => CodecError::Wire(other),
        })?;
        let declared = header.payload_len(&self.limits)?;
        let total = REQUEST_HEADER_SIZE + declared;
        let frame = frame(raw, total, base)?;

        let schema = with_payload_field(base, declared);
        tracing::debug!(schema = %schema.name, streamid = header.streamid, declared, "decoding request");
        let (values, consumed) = decode_fields(&schema, frame)?;
        if consumed != total {
            return Err(CodecError::TrailingData {
                schema: schema.name,
                declared: total,
                decoded: consumed,
            });
        }
        Ok(Decoded {
            record: MessageRecord {
                kind: MessageKind::Request(kind),
                schema,
                values,
                nested: None,
            },
            consumed,
        })
    }

    /// Decodes every request in `raw`, splitting piggybacked requests.
    pub fn decode_requests(&self, raw: &[u8]) -> CodecResult<Vec<MessageRecord>> {
        let mut records = Vec::new();
        let mut rest = raw;
        while !rest.is_empty() {
            if records.len() == self.limits.max_messages {
                return Err(CodecError::Wire(wire::DecodeError::LimitsExceeded {
                    kind: wire::LimitKind::MessageCount,
                    limit: self.limits.max_messages,
                    actual: records.len() + 1,
                }));
            }
            let decoded = self.decode_request(rest)?;
            rest = &rest[decoded.consumed..];
            records.push(decoded.record);
        }
        Ok(records)
    }

    /// Decodes a response to `request` from the start of `raw`.
    pub fn decode_response(&self, raw: &[u8], request: &MessageRecord) -> CodecResult<Decoded> {
        self.decode_response_at_depth(raw, request, 0)
    }

    fn decode_response_at_depth(
        &self,
        raw: &[u8],
        request: &MessageRecord,
        depth: usize,
    ) -> CodecResult<Decoded> {
        if depth > MAX_NESTING {
            return Err(CodecError::NestingTooDeep { depth });
        }
        let header_schema = self.registry.schema_for(RESPONSE_HEADER_SCHEMA)?;
        let header = ResponseHeader::decode(raw).map_err(|err| match err {
            wire::DecodeError::MessageTooSmall { actual, required } => CodecError::Truncated {
                schema: header_schema.name.clone(),
                field: "dlen".to_string(),
                offset: 0,
                expected: required,
                actual,
            },
            other => CodecError::Wire(other),
        })?;
        let declared = header.payload_len(&self.limits)?;
        let total = RESPONSE_HEADER_SIZE + declared;
        let frame = frame(raw, total, header_schema)?;

        let status = ResponseStatus::from_code(header.status)?;
        let kind = request
            .request_kind()
            .ok_or_else(|| SchemaError::UnknownName {
                table: CodeTable::Request,
                name: request.type_name().to_string(),
            })?;
        let mut action = None;

        let schema = if kind == RequestKind::Handshake {
            self.registry
                .ok_response_schema(RequestKind::Handshake)
                .cloned()
        } else if status == ResponseStatus::Attn {
            let code = action_code(frame)?;
            action = Some(code);
            Some(attn_schema(self.registry, code)?.clone())
        } else if matches!(status, ResponseStatus::Ok | ResponseStatus::OkSoFar) {
            match self.registry.ok_response_schema(kind) {
                Some(base) if kind == RequestKind::Open => {
                    let options = OpenOptions::from_raw(request.u16("options")?);
                    Some(open_response_schema(base, options, declared))
                }
                other => other.cloned(),
            }
        } else {
            self.registry.status_schema(status).cloned()
        };
        let schema = match schema {
            Some(schema) => schema,
            None => with_payload_field(header_schema, declared),
        };
        tracing::debug!(
            schema = %schema.name,
            request = kind.name(),
            status = status.name(),
            declared,
            "decoding response"
        );

        let (values, consumed) = decode_fields(&schema, frame)?;
        if consumed != total {
            return Err(CodecError::TrailingData {
                schema: schema.name,
                declared: total,
                decoded: consumed,
            });
        }

        let nested = if action == Some(ActionCode::AsynResp) {
            let embedded = &frame[EMBEDDED_RESPONSE_OFFSET.min(frame.len())..];
            let inner = self.decode_response_at_depth(embedded, request, depth + 1)?;
            Some(Box::new(inner.record))
        } else {
            None
        };

        Ok(Decoded {
            record: MessageRecord {
                kind: MessageKind::Response(status),
                schema,
                values,
                nested,
            },
            consumed,
        })
    }
}

/// Appends an opaque `payload` field to layouts that have no variable block.
fn with_payload_field(base: &MessageSchema, declared: usize) -> MessageSchema {
    let has_variable = base
        .fields
        .iter()
        .any(|field| field.wire_type.fixed_width().is_none());
    let mut schema = base.clone();
    if declared > 0 && !has_variable {
        schema
            .fields
            .push(FieldSpec::dlen_sized_minus(PAYLOAD_FIELD, fixed_after_dlen(base)).frozen());
    }
    schema
}

/// Bytes of fixed fields that follow `dlen` and therefore count toward it.
fn fixed_after_dlen(schema: &MessageSchema) -> usize {
    schema
        .fields
        .iter()
        .skip_while(|field| field.name != "dlen")
        .skip(1)
        .filter_map(|field| field.wire_type.fixed_width())
        .sum()
}

fn frame<'a>(raw: &'a [u8], total: usize, schema: &MessageSchema) -> CodecResult<&'a [u8]> {
    raw.get(..total).ok_or_else(|| CodecError::Truncated {
        schema: schema.name.clone(),
        field: "dlen".to_string(),
        offset: 0,
        expected: total,
        actual: raw.len(),
    })
}

fn peek_u16(raw: &[u8], offset: usize, schema: &str, field: &str) -> CodecResult<u16> {
    match raw.get(offset..offset + 2) {
        Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
        _ => Err(CodecError::Truncated {
            schema: schema.to_string(),
            field: field.to_string(),
            offset,
            expected: 2,
            actual: raw.len().saturating_sub(offset),
        }),
    }
}
