//! Schema-driven message encoding and decoding for xrdsim.
//!
//! This crate ties together bytestream, wire and schema to turn protocol
//! messages into named field maps and back.
//!
//! # Features
//!
//! - Encoding any registered layout from a field map
//! - Decoding requests, including piggybacked requests in one buffer
//! - Decoding responses using the originating request as context
//! - Conditional `kXR_open` response fields
//! - Attention messages, with recursive decoding of wrapped responses
//! - Readv chunk lists
//!
//! # Design Principles
//!
//! - **Length faithful** - A message must be exactly as long as it declares.
//! - **Lossless** - Decoded records re-encode to the same bytes.
//! - **No guessing** - Unknown codes and short buffers are errors.

mod attn;
mod builder;
mod chunks;
mod codec;
mod decode;
mod encode;
mod error;
mod open;
mod record;
mod value;

pub use attn::{action_code, attn_schema};
pub use builder::MessageBuilder;
pub use chunks::{
    decode_read_list, decode_readv_response, encode_read_list, encode_readv_response, ReadChunk,
    ReadvSegment, READ_CHUNK_SIZE,
};
pub use codec::{Codec, DecodeHint, Decoded, MAX_NESTING, PAYLOAD_FIELD};
pub use decode::decode_fields;
pub use encode::{check_lengths, encode, encode_checked, encode_record, fill_lengths};
pub use error::{CodecError, CodecResult};
pub use open::open_response_schema;
pub use record::{MessageKind, MessageRecord};
pub use value::{padded, Value, Values};
pub use wire::Limits as WireLimits;
