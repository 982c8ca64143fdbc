//! Bounds-checked little-endian cursor over one object's bytes.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{ParseError, ParseErrorKind, ParseResult};

/// A cursor over a byte slice that remembers where the slice lives in the file.
///
/// Positions passed to [`seek`](Self::seek) and returned by
/// [`tell`](Self::tell) are relative to the slice; errors carry the
/// absolute offset so they can be matched against a hex dump.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    base: u64,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    pub fn with_base(data: &'a [u8], base: u64) -> Self {
        Self { data, pos: 0, base }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn tell(&self) -> usize {
        self.pos
    }

    pub fn absolute(&self) -> u64 {
        self.base + self.pos as u64
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn seek(&mut self, pos: usize) -> ParseResult<()> {
        if pos > self.data.len() {
            return Err(ParseError::new(ParseErrorKind::SeekOutOfBounds(pos)).at(self.absolute()));
        }
        self.pos = pos;
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> ParseResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(ParseError::new(ParseErrorKind::ShortRead {
                needed: n,
                available: self.remaining(),
            })
            .at(self.absolute()));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> ParseResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> ParseResult<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> ParseResult<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> ParseResult<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn peek_bytes(&self, n: usize) -> Option<&'a [u8]> {
        self.data.get(self.pos..self.pos.checked_add(n)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let data = [0x34, 0x12, 0xFE, 0xFF, 0x78, 0x56, 0x34, 0x12, 0xAB];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u16().unwrap(), 0x1234);
        assert_eq!(r.read_i16().unwrap(), -2);
        assert_eq!(r.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(r.read_u8().unwrap(), 0xAB);
        assert!(r.at_end());
    }

    #[test]
    fn test_short_read_reports_absolute_offset() {
        let data = [1, 2, 3];
        let mut r = ByteReader::with_base(&data, 0x100);
        r.read_u16().unwrap();
        let err = r.read_u32().unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::ShortRead {
                needed: 4,
                available: 1
            }
        );
        assert_eq!(err.offset, Some(0x102));
        // A failed read leaves the cursor where it was.
        assert_eq!(r.tell(), 2);
    }

    #[test]
    fn test_seek_bounds() {
        let data = [0u8; 4];
        let mut r = ByteReader::new(&data);
        assert!(r.seek(4).is_ok());
        assert!(r.at_end());
        assert!(r.seek(5).is_err());
        r.seek(1).unwrap();
        assert_eq!(r.peek_bytes(3), Some(&data[1..4]));
        assert_eq!(r.peek_bytes(4), None);
    }
}
