//! Message framing over byte buffers.
//!
//! A request frame is either the 20-byte handshake or a 24-byte header plus
//! `dlen` payload bytes. A response frame is an 8-byte header plus `dlen`
//! body bytes. Clients may piggyback several requests in one send, so
//! [`split_requests`] walks a buffer frame by frame.

use crate::error::{DecodeError, LimitKind, WireResult};
use crate::header::{
    is_handshake, RequestHeader, ResponseHeader, HANDSHAKE_SIZE, REQUEST_HEADER_SIZE,
    RESPONSE_HEADER_SIZE,
};
use crate::limits::Limits;

/// Returns the total length of the request frame at the start of `buf`.
///
/// Fails if the header is incomplete or the buffer holds fewer payload
/// bytes than declared.
pub fn request_frame_len(buf: &[u8], limits: &Limits) -> WireResult<usize> {
    if is_handshake(buf) {
        return Ok(HANDSHAKE_SIZE);
    }
    let header = RequestHeader::decode(buf)?;
    let payload = header.payload_len(limits)?;
    let available = buf.len() - REQUEST_HEADER_SIZE;
    if available < payload {
        return Err(DecodeError::PayloadLengthMismatch {
            declared: payload,
            actual: available,
        });
    }
    Ok(REQUEST_HEADER_SIZE + payload)
}

/// Returns the total length of the response frame at the start of `buf`.
pub fn response_frame_len(buf: &[u8], limits: &Limits) -> WireResult<usize> {
    let header = ResponseHeader::decode(buf)?;
    let payload = header.payload_len(limits)?;
    let available = buf.len() - RESPONSE_HEADER_SIZE;
    if available < payload {
        return Err(DecodeError::PayloadLengthMismatch {
            declared: payload,
            actual: available,
        });
    }
    Ok(RESPONSE_HEADER_SIZE + payload)
}

/// Splits a buffer of back-to-back requests into individual frames.
pub fn split_requests<'a>(buf: &'a [u8], limits: &Limits) -> WireResult<Vec<&'a [u8]>> {
    let mut frames = Vec::new();
    let mut rest = buf;
    while !rest.is_empty() {
        if frames.len() == limits.max_messages {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::MessageCount,
                limit: limits.max_messages,
                actual: frames.len() + 1,
            });
        }
        let len = request_frame_len(rest, limits)?;
        let (frame, tail) = rest.split_at(len);
        frames.push(frame);
        rest = tail;
    }
    Ok(frames)
}
