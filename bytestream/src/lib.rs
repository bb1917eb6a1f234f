//! Big-endian byte primitives for the xrdsim codec.
//!
//! This crate provides [`ByteWriter`] and [`ByteReader`] for encoding and decoding
//! the fixed-width integers and raw byte blocks that make up protocol messages.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about requests, responses, or schemas.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteReader, ByteWriter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_u16(1);
//! writer.write_i32(-42);
//!
//! let bytes = writer.finish();
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_u16().unwrap(), 1);
//! assert_eq!(reader.read_i32().unwrap(), -42);
//! ```

mod error;
mod reader;
mod writer;

pub use error::{ByteError, ByteResult};
pub use reader::ByteReader;
pub use writer::ByteWriter;
