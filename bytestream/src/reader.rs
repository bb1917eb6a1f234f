//! Big-endian byte reader with bounded operations.

use crate::error::{ByteError, ByteResult};

/// A cursor over a byte slice that decodes big-endian integers.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the unread tail of the buffer without consuming it.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    /// Reads a `u8`.
    pub fn read_u8(&mut self) -> ByteResult<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16(&mut self) -> ByteResult<u16> {
        Ok(u16::from_be_bytes(self.read_array::<2>()?))
    }

    /// Reads a big-endian `i32`.
    pub fn read_i32(&mut self) -> ByteResult<i32> {
        Ok(i32::from_be_bytes(self.read_array::<4>()?))
    }

    /// Reads a big-endian `i64`.
    pub fn read_i64(&mut self) -> ByteResult<i64> {
        Ok(i64::from_be_bytes(self.read_array::<8>()?))
    }

    /// Reads exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> ByteResult<&'a [u8]> {
        self.ensure_bytes(len)?;
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..self.pos])
    }

    fn read_array<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        let slice = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn ensure_bytes(&self, len: usize) -> ByteResult<()> {
        if len > self.remaining() {
            return Err(ByteError::UnexpectedEof {
                offset: self.pos,
                requested: len,
                available: self.remaining(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_reader() {
        let data = [0u8; 4];
        let reader = ByteReader::new(&data);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.remaining(), 4);
        assert!(!reader.is_empty());
    }

    #[test]
    fn empty_reader() {
        let reader = ByteReader::new(&[]);
        assert!(reader.is_empty());
        assert!(reader.rest().is_empty());
    }

    #[test]
    fn read_integers_big_endian() {
        let data = [
            0x7F, 0x12, 0x34, 0x00, 0x00, 0x02, 0x97, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
            0x00,
        ];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_u8().unwrap(), 0x7F);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_i32().unwrap(), 0x297);
        assert_eq!(reader.read_i64().unwrap(), 0x100);
        assert!(reader.is_empty());
    }

    #[test]
    fn read_negative_i32() {
        let data = [0xFF, 0xFF, 0xFF, 0xFE];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_i32().unwrap(), -2);
    }

    #[test]
    fn read_bytes_advances() {
        let data = b"abcdef";
        let mut reader = ByteReader::new(data);
        assert_eq!(reader.read_bytes(2).unwrap(), b"ab");
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.rest(), b"cdef");
        assert_eq!(reader.read_bytes(0).unwrap(), b"");
        assert_eq!(reader.read_bytes(4).unwrap(), b"cdef");
    }

    #[test]
    fn read_past_end_reports_offset() {
        let data = [0u8; 3];
        let mut reader = ByteReader::new(&data);
        reader.read_u16().unwrap();
        let err = reader.read_i32().unwrap_err();
        assert_eq!(
            err,
            ByteError::UnexpectedEof {
                offset: 2,
                requested: 4,
                available: 1,
            }
        );
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn failed_read_does_not_consume() {
        let data = [1u8, 2];
        let mut reader = ByteReader::new(&data);
        assert!(reader.read_bytes(3).is_err());
        assert_eq!(reader.read_u16().unwrap(), 0x0102);
    }
}
