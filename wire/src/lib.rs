//! Message headers and framing for the xrdsim protocol simulator.
//!
//! This crate handles the fixed parts of the binary wire format: the client
//! handshake, the 24-byte request header, the 8-byte response header, and
//! splitting byte buffers into message frames. It does not know about
//! per-request layouts; those live in the schema registry.
//!
//! # Design Principles
//!
//! - **Big-endian everywhere** - All integers use network byte order.
//! - **Bounded decoding** - Declared lengths are validated against limits before any read.
//! - **No domain knowledge** - This crate frames messages, it does not interpret them.

mod error;
mod frame;
mod header;
mod limits;

pub use error::{DecodeError, EncodeError, LimitKind, WireResult};
pub use frame::{request_frame_len, response_frame_len, split_requests};
pub use header::{
    dlen_for, encode_handshake, is_handshake, payload_len, RequestHeader, ResponseHeader,
    HANDSHAKE_REQUEST_ID, HANDSHAKE_SIZE, HANDSHAKE_WORDS, PROTOCOL_VERSION, REQUEST_HEADER_SIZE,
    REQUEST_PARAMS_SIZE, RESPONSE_HEADER_SIZE,
};
pub use limits::Limits;

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn public_api_exports() {
        let _ = HANDSHAKE_SIZE;
        let _ = HANDSHAKE_WORDS;
        let _ = PROTOCOL_VERSION;
        let _ = REQUEST_HEADER_SIZE;
        let _ = RESPONSE_HEADER_SIZE;
        let _ = Limits::default();
        let _ = LimitKind::PayloadBytes;

        let _: WireResult<()> = Ok(());
    }

    #[test]
    fn request_header_size_constant_correct() {
        assert_eq!(
            REQUEST_HEADER_SIZE,
            size_of::<u16>() // streamid
                + size_of::<u16>() // requestid
                + REQUEST_PARAMS_SIZE
                + size_of::<i32>() // dlen
        );
    }

    #[test]
    fn handshake_is_not_a_request_header() {
        let bytes = encode_handshake(HANDSHAKE_WORDS);
        assert!(RequestHeader::decode(&bytes).is_err());
    }
}
