//! Message header types and protocol constants.

use bytestream::{ByteReader, ByteWriter};

use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};
use crate::limits::Limits;

/// Size of the client's initial handshake (five 32-bit words).
pub const HANDSHAKE_SIZE: usize = 5 * 4;

/// The well-known handshake words sent by a client.
///
/// Only the fifth word varies between clients.
pub const HANDSHAKE_WORDS: [i32; 5] = [0, 0, 0, 4, 2012];

/// Size of the parameter block between the request code and `dlen`.
pub const REQUEST_PARAMS_SIZE: usize = 16;

/// Request header size in bytes (24 total).
pub const REQUEST_HEADER_SIZE: usize = 2 + 2 + REQUEST_PARAMS_SIZE + 4;

/// Response header size in bytes (8 total).
pub const RESPONSE_HEADER_SIZE: usize = 2 + 2 + 4;

/// Protocol version advertised by both roles.
pub const PROTOCOL_VERSION: i32 = 0x297;

/// Request code carried by the handshake (the low half of its first word).
pub const HANDSHAKE_REQUEST_ID: u16 = 0;

/// Returns `true` if `buf` starts with a client handshake.
///
/// The first four words are fixed; the fifth is accepted as-is so that
/// mutated handshakes are still framed as handshakes.
#[must_use]
pub fn is_handshake(buf: &[u8]) -> bool {
    if buf.len() < HANDSHAKE_SIZE {
        return false;
    }
    let mut reader = ByteReader::new(buf);
    HANDSHAKE_WORDS[..4]
        .iter()
        .all(|expected| reader.read_i32().is_ok_and(|word| word == *expected))
}

/// Encodes a client handshake from its five words.
#[must_use]
pub fn encode_handshake(words: [i32; 5]) -> Vec<u8> {
    let mut writer = ByteWriter::with_capacity(HANDSHAKE_SIZE);
    for word in words {
        writer.write_i32(word);
    }
    writer.finish()
}

/// Converts a declared `dlen` into a bounded payload length.
pub fn payload_len(dlen: i32, limits: &Limits) -> WireResult<usize> {
    let len = usize::try_from(dlen).map_err(|_| DecodeError::NegativeLength { dlen })?;
    if len > limits.max_payload_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::PayloadBytes,
            limit: limits.max_payload_bytes,
            actual: len,
        });
    }
    Ok(len)
}

/// Converts a payload length into a `dlen` value.
pub fn dlen_for(len: usize) -> Result<i32, EncodeError> {
    i32::try_from(len).map_err(|_| EncodeError::LengthOverflow { length: len })
}

/// Fixed 24-byte header shared by every non-handshake request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestHeader {
    /// Client-chosen stream identifier echoed in the response.
    pub streamid: u16,
    /// Request code (`kXR_*`).
    pub requestid: u16,
    /// Request-specific parameter block.
    pub params: [u8; REQUEST_PARAMS_SIZE],
    /// Declared payload length.
    pub dlen: i32,
}

impl RequestHeader {
    /// Decodes a request header from the start of `buf`.
    pub fn decode(buf: &[u8]) -> WireResult<Self> {
        if buf.len() < REQUEST_HEADER_SIZE {
            return Err(DecodeError::MessageTooSmall {
                actual: buf.len(),
                required: REQUEST_HEADER_SIZE,
            });
        }
        let mut reader = ByteReader::new(buf);
        let streamid = reader.read_u16()?;
        let requestid = reader.read_u16()?;
        let mut params = [0u8; REQUEST_PARAMS_SIZE];
        params.copy_from_slice(reader.read_bytes(REQUEST_PARAMS_SIZE)?);
        let dlen = reader.read_i32()?;
        Ok(Self {
            streamid,
            requestid,
            params,
            dlen,
        })
    }

    /// Appends this header to `writer`.
    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u16(self.streamid);
        writer.write_u16(self.requestid);
        writer.write_bytes(&self.params);
        writer.write_i32(self.dlen);
    }

    /// Returns the declared payload length, validated against `limits`.
    pub fn payload_len(&self, limits: &Limits) -> WireResult<usize> {
        payload_len(self.dlen, limits)
    }
}

/// Fixed 8-byte header shared by every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Stream identifier of the request being answered.
    pub streamid: u16,
    /// Response status (`kXR_ok`, `kXR_attn`, ...).
    pub status: u16,
    /// Declared body length.
    pub dlen: i32,
}

impl ResponseHeader {
    /// Decodes a response header from the start of `buf`.
    pub fn decode(buf: &[u8]) -> WireResult<Self> {
        if buf.len() < RESPONSE_HEADER_SIZE {
            return Err(DecodeError::MessageTooSmall {
                actual: buf.len(),
                required: RESPONSE_HEADER_SIZE,
            });
        }
        let mut reader = ByteReader::new(buf);
        Ok(Self {
            streamid: reader.read_u16()?,
            status: reader.read_u16()?,
            dlen: reader.read_i32()?,
        })
    }

    /// Appends this header to `writer`.
    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u16(self.streamid);
        writer.write_u16(self.status);
        writer.write_i32(self.dlen);
    }

    /// Returns the declared body length, validated against `limits`.
    pub fn payload_len(&self, limits: &Limits) -> WireResult<usize> {
        payload_len(self.dlen, limits)
    }
}
