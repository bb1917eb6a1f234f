//! Building records field by field.

use schema::{MessageSchema, Registry, RequestKind, ResponseStatus};
use wire::HANDSHAKE_WORDS;

use crate::encode::{check_lengths, encode, fill_lengths};
use crate::error::{CodecError, CodecResult};
use crate::record::{MessageKind, MessageRecord};
use crate::value::{Value, Values};

/// Assembles a [`MessageRecord`] from zeroed defaults.
///
/// Every field starts at its zero value; `set` overrides individual fields
/// and `build` recomputes length fields such as `dlen`.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    kind: MessageKind,
    schema: MessageSchema,
    values: Values,
    unknown: Option<String>,
}

impl MessageBuilder {
    #[must_use]
    pub fn new(kind: MessageKind, schema: MessageSchema) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|field| (field.name.to_string(), Value::zero(field.wire_type)))
            .collect();
        Self {
            kind,
            schema,
            values,
            unknown: None,
        }
    }

    /// Starts a request of `kind` with its request code filled in.
    pub fn request(registry: &Registry, kind: RequestKind) -> CodecResult<Self> {
        let schema = registry.request_schema(kind)?.clone();
        let builder = Self::new(MessageKind::Request(kind), schema);
        if kind == RequestKind::Handshake {
            let [first, second, third, fourth, fifth] = HANDSHAKE_WORDS;
            return Ok(builder
                .set("first", first)
                .set("second", second)
                .set("third", third)
                .set("fourth", fourth)
                .set("fifth", fifth));
        }
        Ok(builder.set("requestid", kind.code()))
    }

    /// Starts a response with `status` on `streamid`, laid out as `schema`.
    #[must_use]
    pub fn response(schema: MessageSchema, status: ResponseStatus, streamid: u16) -> Self {
        Self::new(MessageKind::Response(status), schema)
            .set("status", status.code())
            .set("streamid", streamid)
    }

    /// Overrides one field.
    #[must_use]
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        if self.schema.contains(field) {
            self.values.insert(field.to_string(), value.into());
        } else if self.unknown.is_none() {
            self.unknown = Some(field.to_string());
        }
        self
    }

    /// Finishes the record, computing every length field.
    pub fn build(mut self) -> CodecResult<MessageRecord> {
        if let Some(field) = self.unknown {
            return Err(CodecError::MissingValue {
                schema: self.schema.name,
                field,
            });
        }
        fill_lengths(&self.schema, &mut self.values)?;
        check_lengths(&self.schema, &self.values)?;
        Ok(MessageRecord {
            kind: self.kind,
            schema: self.schema,
            values: self.values,
            nested: None,
        })
    }

    /// Builds and encodes in one step.
    pub fn encode(self) -> CodecResult<Vec<u8>> {
        let record = self.build()?;
        encode(&record.schema, &record.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_code_and_dlen() {
        let record = MessageBuilder::request(Registry::shared(), RequestKind::Stat)
            .unwrap()
            .set("streamid", 7u16)
            .set("path", "/tmp")
            .build()
            .unwrap();
        assert_eq!(record.u16("requestid").unwrap(), 3017);
        assert_eq!(record.i32("dlen").unwrap(), 4);
        assert_eq!(record.streamid(), 7);
    }

    #[test]
    fn handshake_builder_uses_fixed_words() {
        let raw = MessageBuilder::request(Registry::shared(), RequestKind::Handshake)
            .unwrap()
            .encode()
            .unwrap();
        assert_eq!(raw, wire::encode_handshake(HANDSHAKE_WORDS));
    }

    #[test]
    fn response_builder_counts_body_after_header() {
        let schema = Registry::shared()
            .status_schema(ResponseStatus::Error)
            .unwrap()
            .clone();
        let record = MessageBuilder::response(schema, ResponseStatus::Error, 3)
            .set("errnum", 3011i32)
            .set("errmsg", "not found")
            .build()
            .unwrap();
        assert_eq!(record.i32("dlen").unwrap(), 13);
        assert_eq!(record.u16("status").unwrap(), 4003);
    }

    #[test]
    fn unknown_field_is_reported() {
        let err = MessageBuilder::request(Registry::shared(), RequestKind::Ping)
            .unwrap()
            .set("path", "/tmp")
            .build()
            .unwrap_err();
        assert!(matches!(err, CodecError::MissingValue { ref field, .. } if field == "path"));
    }
}
