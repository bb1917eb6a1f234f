//! Decoded message records.

use schema::{MessageSchema, RequestKind, ResponseStatus};

use crate::error::{CodecError, CodecResult};
use crate::value::{Value, Values};

/// What a record is: a request of some kind, or a response with some status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MessageKind {
    Request(RequestKind),
    Response(ResponseStatus),
}

impl MessageKind {
    /// The synthesized `type` of the record (`kXR_login`, `kXR_ok`, ...).
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Request(kind) => kind.name(),
            Self::Response(status) => status.name(),
        }
    }
}

/// The decoded form of one message.
///
/// `schema` is the effective layout the message was decoded with, after any
/// conditional fields were removed or an opaque `payload` field was added, so
/// re-encoding a record reproduces its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MessageRecord {
    pub kind: MessageKind,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub schema: MessageSchema,
    pub values: Values,
    /// The embedded response of a `kXR_asynresp` attention message.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub nested: Option<Box<MessageRecord>>,
}

impl MessageRecord {
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Returns the request kind for request records.
    #[must_use]
    pub const fn request_kind(&self) -> Option<RequestKind> {
        match self.kind {
            MessageKind::Request(kind) => Some(kind),
            MessageKind::Response(_) => None,
        }
    }

    /// Returns the status for response records.
    #[must_use]
    pub const fn status(&self) -> Option<ResponseStatus> {
        match self.kind {
            MessageKind::Response(status) => Some(status),
            MessageKind::Request(_) => None,
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    fn require(&self, field: &str) -> CodecResult<&Value> {
        self.values.get(field).ok_or_else(|| CodecError::MissingValue {
            schema: self.schema.name.clone(),
            field: field.to_string(),
        })
    }

    fn mismatch(&self, field: &str, value: &Value) -> CodecError {
        CodecError::TypeMismatch {
            schema: self.schema.name.clone(),
            field: field.to_string(),
            found: value.kind_name(),
        }
    }

    pub fn u8(&self, field: &str) -> CodecResult<u8> {
        match self.require(field)? {
            Value::U8(v) => Ok(*v),
            other => Err(self.mismatch(field, other)),
        }
    }

    pub fn u16(&self, field: &str) -> CodecResult<u16> {
        match self.require(field)? {
            Value::U16(v) => Ok(*v),
            other => Err(self.mismatch(field, other)),
        }
    }

    pub fn i32(&self, field: &str) -> CodecResult<i32> {
        match self.require(field)? {
            Value::I32(v) => Ok(*v),
            other => Err(self.mismatch(field, other)),
        }
    }

    pub fn i64(&self, field: &str) -> CodecResult<i64> {
        match self.require(field)? {
            Value::I64(v) => Ok(*v),
            other => Err(self.mismatch(field, other)),
        }
    }

    pub fn bytes(&self, field: &str) -> CodecResult<&[u8]> {
        match self.require(field)? {
            Value::Bytes(v) => Ok(v),
            other => Err(self.mismatch(field, other)),
        }
    }

    /// Returns the stream id (zero for handshakes, which carry none).
    #[must_use]
    pub fn streamid(&self) -> u16 {
        match self.values.get("streamid") {
            Some(Value::U16(v)) => *v,
            _ => 0,
        }
    }
}
