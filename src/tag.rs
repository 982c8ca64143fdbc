//! Tag decoding.
//!
//! Every LRF record is a run of tags: a little-endian 16-bit id whose high
//! byte is always `0xF5`, followed by a payload whose shape is fixed per id.
//! The shape table below is the only place that knows payload sizes; the
//! per-object tag tables in [`crate::schema`] only decide what a tag means.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::io::ByteReader;
use crate::util::decode_utf16le;

/// High byte shared by every tag id.
pub const TAG_MARKER: u8 = 0xF5;

pub const OBJECT_START: u16 = 0xF500;
pub const OBJECT_END: u16 = 0xF501;
pub const STREAM_SIZE: u16 = 0xF504;
pub const STREAM_START: u16 = 0xF505;
pub const STREAM_END: u16 = 0xF506;
pub const LINK: u16 = 0xF503;
pub const FONT_FACE_NAME: u16 = 0xF516;
pub const RAW_TEXT: u16 = 0xF5CC;

/// Payload shape of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Exactly `n` raw bytes.
    Fixed(usize),
    /// u16 byte length followed by UTF-16LE text.
    String,
    /// u16 count followed by that many u32 ids.
    IdList,
    /// u32 font reference, a nested `F516` string tag, u16 code point.
    EmpDots,
    /// u16 length followed by raw bytes.
    Blob,
}

/// Payload shape for a tag id, or `None` if the id is not a known tag.
pub fn payload_kind(id: u16) -> Option<PayloadKind> {
    use PayloadKind::*;

    if (id >> 8) as u8 != TAG_MARKER {
        return None;
    }
    let kind = match id as u8 {
        0x00 => Fixed(6),
        0x01 => Fixed(0),
        0x02..=0x04 => Fixed(4),
        0x05 | 0x06 => Fixed(0),
        0x07..=0x0A => Fixed(4),
        0x0B => IdList,
        0x0D | 0x0E => Fixed(2),
        0x11..=0x15 => Fixed(2),
        0x16 => String,
        0x17 | 0x18 => Fixed(4),
        0x19..=0x1E => Fixed(2),
        0x21..=0x28 => Fixed(2),
        0x29 => Fixed(6),
        0x2A..=0x2C => Fixed(2),
        0x2D => Fixed(4),
        0x2E => Fixed(2),
        0x31..=0x33 => Fixed(2),
        0x34 => Fixed(4),
        0x35 | 0x36 => Fixed(2),
        0x37 => Fixed(4),
        0x38..=0x3A => Fixed(2),
        0x3C..=0x3E => Fixed(2),
        0x41 | 0x42 => Fixed(2),
        0x44 | 0x45 => Fixed(4),
        0x46..=0x48 => Fixed(2),
        0x49 | 0x4A => Fixed(8),
        0x4B | 0x4C => Fixed(4),
        0x4D => Fixed(0),
        0x4E => Fixed(12),
        0x51 | 0x52 => Fixed(2),
        0x53 => Fixed(4),
        0x54 => Fixed(2),
        0x55 | 0x56 => String,
        0x57 | 0x58 => Fixed(2),
        0x59 | 0x5A => String,
        0x5B => Fixed(4),
        0x5C => IdList,
        0x5D => String,
        0x5E => Fixed(2),
        0x61 => Fixed(2),
        0x62..=0x6B => Fixed(0),
        0x6C => Fixed(8),
        0x6D => Fixed(2),
        0x6E => Fixed(0),
        0x71 | 0x72 => Fixed(0),
        0x73 => Fixed(10),
        0x75..=0x77 => Fixed(2),
        0x78 => EmpDots,
        0x79 | 0x7A => Fixed(2),
        0x7B | 0x7C => Fixed(4),
        0x81 | 0x82 => Fixed(0),
        0xA1 => Fixed(4),
        0xA2 => Fixed(0),
        0xA5 => Blob,
        0xA6 => Fixed(0),
        0xA7 => Fixed(4),
        0xA8..=0xAE => Fixed(0),
        0xB1..=0xBE => Fixed(0),
        0xC1 | 0xC2 => Fixed(0),
        0xC3 => Fixed(2),
        0xC4 => Fixed(0),
        0xC5 | 0xC6 => Fixed(2),
        0xC7 => Fixed(0),
        0xC8 => Fixed(2),
        0xC9 => Fixed(0),
        0xCA => Fixed(2),
        0xCB => Blob,
        0xCC => Fixed(2),
        0xD1 => Fixed(12),
        0xD2 => Fixed(0),
        0xD4 => Fixed(2),
        0xD6 => Fixed(0),
        0xD7 => Fixed(14),
        0xD8 => Fixed(4),
        0xD9 => Fixed(8),
        0xDA..=0xDD => Fixed(2),
        0xF1 => Fixed(2),
        0xF2 | 0xF3 => Fixed(4),
        0xF4 => Fixed(2),
        0xF5..=0xF8 => Fixed(4),
        0xF9 => Fixed(6),
        _ => return None,
    };
    Some(kind)
}

/// Decoded payload of a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<'a> {
    Bytes(&'a [u8]),
    String(String),
    IdList(Vec<u32>),
    EmpDots {
        font_ref: u32,
        face_name: String,
        code: u16,
    },
}

/// One decoded tag, borrowing fixed payloads from the object buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub id: u16,
    /// Absolute file offset of the tag id.
    pub offset: u64,
    pub payload: Payload<'a>,
}

impl<'a> Tag<'a> {
    /// Decode the tag at the reader's position.
    pub fn read(reader: &mut ByteReader<'a>) -> ParseResult<Tag<'a>> {
        let offset = reader.absolute();
        let id = reader.read_u16()?;
        if (id >> 8) as u8 != TAG_MARKER {
            return Err(
                ParseError::new(ParseErrorKind::BadTagMarker((id >> 8) as u8))
                    .with_tag(id)
                    .at(offset),
            );
        }
        let kind = payload_kind(id)
            .ok_or_else(|| ParseError::new(ParseErrorKind::UnknownTag).with_tag(id).at(offset))?;

        let payload = read_payload(reader, kind).map_err(|e| e.with_tag(id).at(offset))?;
        Ok(Tag {
            id,
            offset,
            payload,
        })
    }

    /// Raw bytes of a fixed or blob payload; empty for decoded payloads.
    pub fn contents(&self) -> &'a [u8] {
        match self.payload {
            Payload::Bytes(bytes) => bytes,
            _ => &[],
        }
    }

    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind).with_tag(self.id).at(self.offset)
    }

    /// Payload bytes, checked to be exactly `n` long.
    pub fn fixed(&self, n: usize) -> ParseResult<&'a [u8]> {
        let bytes = self.contents();
        if bytes.len() != n {
            return Err(self.error(ParseErrorKind::PayloadSize {
                expected: n,
                actual: bytes.len(),
            }));
        }
        Ok(bytes)
    }

    pub fn byte(&self) -> ParseResult<u8> {
        // Byte-valued attributes are stored in a two-byte slot.
        let bytes = self.contents();
        bytes.first().copied().ok_or_else(|| {
            self.error(ParseErrorKind::PayloadSize {
                expected: 1,
                actual: 0,
            })
        })
    }

    pub fn word(&self) -> ParseResult<u16> {
        Ok(LittleEndian::read_u16(self.fixed(2)?))
    }

    pub fn sword(&self) -> ParseResult<i16> {
        Ok(LittleEndian::read_i16(self.fixed(2)?))
    }

    pub fn dword(&self) -> ParseResult<u32> {
        Ok(LittleEndian::read_u32(self.fixed(4)?))
    }

    pub fn string(&self) -> ParseResult<&str> {
        match &self.payload {
            Payload::String(s) => Ok(s),
            _ => Err(self.error(ParseErrorKind::PayloadSize {
                expected: 2,
                actual: self.contents().len(),
            })),
        }
    }

    pub fn ids(&self) -> ParseResult<&[u32]> {
        match &self.payload {
            Payload::IdList(ids) => Ok(ids),
            _ => Err(self.error(ParseErrorKind::PayloadSize {
                expected: 2,
                actual: self.contents().len(),
            })),
        }
    }
}

fn read_payload<'a>(reader: &mut ByteReader<'a>, kind: PayloadKind) -> ParseResult<Payload<'a>> {
    Ok(match kind {
        PayloadKind::Fixed(n) => Payload::Bytes(reader.read_bytes(n)?),
        PayloadKind::String => Payload::String(read_string(reader)?),
        PayloadKind::Blob => {
            let len = reader.read_u16()? as usize;
            Payload::Bytes(reader.read_bytes(len)?)
        }
        PayloadKind::IdList => {
            let count = reader.read_u16()? as usize;
            let ids = (0..count)
                .map(|_| reader.read_u32())
                .collect::<ParseResult<Vec<_>>>()?;
            Payload::IdList(ids)
        }
        PayloadKind::EmpDots => {
            let font_ref = reader.read_u32()?;
            let inner = Tag::read(reader)?;
            let (FONT_FACE_NAME, Payload::String(face_name)) = (inner.id, inner.payload) else {
                return Err(ParseError::new(ParseErrorKind::BadEmpDots));
            };
            let code = reader.read_u16()?;
            Payload::EmpDots {
                font_ref,
                face_name,
                code,
            }
        }
    })
}

/// Read a length-prefixed UTF-16LE string (u16 byte count).
pub fn read_string(reader: &mut ByteReader<'_>) -> ParseResult<String> {
    let len = reader.read_u16()? as usize;
    Ok(decode_utf16le(reader.read_bytes(len)?))
}

/// Split a fixed payload into little-endian words and dwords by layout.
///
/// `layout` uses `H` for u16 and `I` for u32, e.g. `"HIHI"`.
pub(crate) fn unpack(bytes: &[u8], layout: &str) -> Vec<u32> {
    let mut out = Vec::with_capacity(layout.len());
    let mut pos = 0;
    for ch in layout.chars() {
        match ch {
            'H' if pos + 2 <= bytes.len() => {
                out.push(u32::from(LittleEndian::read_u16(&bytes[pos..])));
                pos += 2;
            }
            'I' if pos + 4 <= bytes.len() => {
                out.push(LittleEndian::read_u32(&bytes[pos..]));
                pos += 4;
            }
            _ => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::encode_utf16le;

    fn read(bytes: &[u8]) -> ParseResult<Tag<'_>> {
        Tag::read(&mut ByteReader::new(bytes))
    }

    #[test]
    fn test_object_start_tag() {
        let bytes = [0x00, 0xF5, 0x2A, 0, 0, 0, 0x0A, 0x00];
        let tag = read(&bytes).unwrap();
        assert_eq!(tag.id, OBJECT_START);
        assert_eq!(unpack(tag.fixed(6).unwrap(), "IH"), vec![42, 0x0A]);
    }

    #[test]
    fn test_string_tag() {
        let mut bytes = vec![0x16, 0xF5];
        let text = encode_utf16le("Dutch801 Rm BT Roman");
        bytes.extend((text.len() as u16).to_le_bytes());
        bytes.extend(&text);
        let tag = read(&bytes).unwrap();
        assert_eq!(tag.string().unwrap(), "Dutch801 Rm BT Roman");
    }

    #[test]
    fn test_id_list_tag() {
        let bytes = [0x5C, 0xF5, 2, 0, 5, 0, 0, 0, 9, 0, 0, 0];
        let tag = read(&bytes).unwrap();
        assert_eq!(tag.ids().unwrap(), &[5, 9]);
    }

    #[test]
    fn test_empdots_tag() {
        let mut bytes = vec![0x78, 0xF5, 7, 0, 0, 0, 0x16, 0xF5];
        let face = encode_utf16le("Font");
        bytes.extend((face.len() as u16).to_le_bytes());
        bytes.extend(&face);
        bytes.extend(0x25CFu16.to_le_bytes());
        let tag = read(&bytes).unwrap();
        assert_eq!(
            tag.payload,
            Payload::EmpDots {
                font_ref: 7,
                face_name: "Font".into(),
                code: 0x25CF
            }
        );
    }

    #[test]
    fn test_empdots_requires_face_name_tag() {
        let bytes = [0x78, 0xF5, 7, 0, 0, 0, 0x55, 0xF5, 0, 0, 0, 0];
        let err = read(&bytes).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::BadEmpDots);
        assert_eq!(err.tag, Some(0xF578));
    }

    #[test]
    fn test_bad_marker() {
        let err = read(&[0x00, 0xF4]).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::BadTagMarker(0xF4));
    }

    #[test]
    fn test_unknown_tag() {
        let err = read(&[0xFF, 0xF5]).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownTag);
        assert_eq!(err.tag, Some(0xF5FF));
        assert_eq!(err.offset, Some(0));
    }

    #[test]
    fn test_truncated_payload_names_tag() {
        let bytes = [0x00, 0x00, 0x11, 0xF5, 0x64];
        let mut reader = ByteReader::with_base(&bytes, 0x20);
        reader.seek(2).unwrap();
        let err = Tag::read(&mut reader).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::ShortRead { .. }));
        assert_eq!(err.tag, Some(0xF511));
    }

    #[test]
    fn test_accessor_size_mismatch() {
        let tag = read(&[0x11, 0xF5, 0x64, 0x00]).unwrap();
        assert_eq!(tag.word().unwrap(), 100);
        assert_eq!(tag.sword().unwrap(), 100);
        assert!(matches!(
            tag.dword().unwrap_err().kind,
            ParseErrorKind::PayloadSize {
                expected: 4,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_every_known_id_has_marker() {
        for low in 0u16..=0xFF {
            assert!(payload_kind(0xF400 | low).is_none());
        }
        assert_eq!(payload_kind(0xF573), Some(PayloadKind::Fixed(10)));
        assert_eq!(payload_kind(0xF5A1), Some(PayloadKind::Fixed(4)));
        assert_eq!(payload_kind(0xF5CB), Some(PayloadKind::Blob));
    }
}
