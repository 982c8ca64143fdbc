//! Embedded stream codec: descrambling, zlib inflation and trailer handling.
//!
//! A stream is introduced by `F504` (byte size) and `F554` (flags) and its
//! body follows `F505`. Flag `0x200` marks a scrambled body, flag `0x100` a
//! zlib body with a four-byte uncompressed-size prefix. Descrambling happens
//! before inflation.

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::{debug, warn};

use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::io::ByteReader;

pub const FLAG_COMPRESSED: u16 = 0x0100;
pub const FLAG_SCRAMBLED: u16 = 0x0200;

/// Bytes that close a stream body: the `F506` tag.
pub const TRAILER: [u8; 2] = [0x06, 0xF5];

/// Largest output one input byte can inflate to under zlib.
const MAX_INFLATE_RATIO: u64 = 1032;

/// Resource streams (images, fonts, sounds) are only scrambled at the front.
pub const RESOURCE_SCRAMBLE_LIMIT: usize = 1024;

/// What to do about the two bytes after a stream body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailerPolicy {
    /// Always consume two bytes, warning if they are not the trailer.
    #[default]
    Consume,
    /// Consume the trailer only if it is there.
    Optional,
    /// Reject streams without the trailer.
    Strict,
}

/// Image encoding recorded in the low byte of the stream flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub enum ImageFormat {
    Jpeg,
    Png,
    Bmp,
    Gif,
}

impl ImageFormat {
    pub fn from_flags(flags: u16) -> Option<Self> {
        Self::from_code(flags & 0xFF)
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0x11 => Some(Self::Jpeg),
            0x12 => Some(Self::Png),
            0x13 => Some(Self::Bmp),
            0x14 => Some(Self::Gif),
            _ => None,
        }
    }

    /// Guess from magic bytes, for streams whose flags carry no format.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match data {
            [0xFF, 0xD8, ..] => Some(Self::Jpeg),
            [0x89, b'P', b'N', b'G', ..] => Some(Self::Png),
            [b'B', b'M', ..] => Some(Self::Bmp),
            [b'G', b'I', b'F', ..] => Some(Self::Gif),
            _ => None,
        }
    }

    /// Encoding name as written in LRS `ImageStream` elements.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Bmp => "BMP",
            Self::Gif => "GIF",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Bmp => "image/bmp",
            Self::Gif => "image/gif",
        }
    }
}

/// Stream state of one object.
#[derive(Debug, Clone, Default)]
pub struct StreamInfo {
    pub flags: u16,
    pub size: Option<u32>,
    decoded: Option<ParseResult<Vec<u8>>>,
}

impl StreamInfo {
    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    pub fn is_scrambled(&self) -> bool {
        self.flags & FLAG_SCRAMBLED != 0
    }

    pub fn image_format(&self) -> Option<ImageFormat> {
        ImageFormat::from_flags(self.flags)
    }

    /// Decoded bytes, or the resource error that prevented decoding.
    pub fn data(&self) -> ParseResult<&[u8]> {
        match &self.decoded {
            Some(Ok(data)) => Ok(data),
            Some(Err(err)) => Err(err.clone()),
            None => Err(ParseError::new(ParseErrorKind::MissingStream)),
        }
    }

    pub fn has_body(&self) -> bool {
        self.decoded.is_some()
    }

    /// Move the decoded bytes out, leaving the stream empty.
    pub fn take(&mut self) -> Option<ParseResult<Vec<u8>>> {
        self.decoded.take()
    }

    pub(crate) fn set_decoded(&mut self, decoded: ParseResult<Vec<u8>>) {
        self.decoded = Some(decoded);
    }
}

/// XOR key for a scrambled body of `len` bytes.
///
/// Only the low byte of the per-object key matters; keys of zero or
/// above `0xF0` disable scrambling.
pub fn descramble_key(scramble_key: u16, len: usize) -> u8 {
    let key = usize::from(scramble_key & 0xFF);
    if key != 0 && key <= 0xF0 {
        (len % key + 0x0F) as u8
    } else {
        0
    }
}

/// XOR at most `limit` leading bytes of `buf` with `key`.
pub fn descramble(buf: &mut [u8], key: u8, limit: Option<usize>) {
    if key == 0 {
        return;
    }
    let end = limit.map_or(buf.len(), |limit| limit.min(buf.len()));
    for byte in &mut buf[..end] {
        *byte ^= key;
    }
}

/// Inflate a size-prefixed zlib body.
///
/// The first four bytes hold the expected uncompressed size.
pub fn inflate(buf: &[u8]) -> ParseResult<Vec<u8>> {
    let Some((prefix, body)) = buf.split_first_chunk::<4>() else {
        return Err(ParseError::new(ParseErrorKind::TruncatedCompressedStream));
    };
    inflate_exact(body, u32::from_le_bytes(*prefix))
}

/// Inflate a zlib body that must produce exactly `expected` bytes.
///
/// Output is read at most one byte past `expected`. A declared size that
/// `body` could not inflate to is rejected before anything is allocated.
pub fn inflate_exact(body: &[u8], expected: u32) -> ParseResult<Vec<u8>> {
    let limit = (body.len() as u64).saturating_mul(MAX_INFLATE_RATIO);
    if u64::from(expected) > limit {
        return Err(ParseError::new(ParseErrorKind::DecompressedSizeLimit { expected, limit }));
    }
    let mut out = Vec::with_capacity((expected as usize).min(1 << 24));
    ZlibDecoder::new(body)
        .take(u64::from(expected) + 1)
        .read_to_end(&mut out)
        .map_err(|e| ParseError::new(ParseErrorKind::Inflate(e.to_string())))?;

    if out.len() != expected as usize {
        return Err(ParseError::new(ParseErrorKind::DecompressedSize {
            expected,
            actual: out.len(),
        }));
    }
    Ok(out)
}

/// Decode a raw stream body according to its flags.
pub fn decode(mut raw: Vec<u8>, flags: u16, scramble_key: u16, resource: bool) -> ParseResult<Vec<u8>> {
    if flags & FLAG_SCRAMBLED != 0 {
        let key = descramble_key(scramble_key, raw.len());
        let limit = resource.then_some(RESOURCE_SCRAMBLE_LIMIT);
        descramble(&mut raw, key, limit);
    }
    if flags & FLAG_COMPRESSED != 0 {
        inflate(&raw)
    } else {
        Ok(raw)
    }
}

/// Read a stream body at the reader's position (just past `F505`).
///
/// Resource failures are stored on `info`; structural failures are returned.
pub(crate) fn read_body(
    reader: &mut ByteReader<'_>,
    info: &mut StreamInfo,
    scramble_key: u16,
    resource: bool,
    policy: TrailerPolicy,
) -> ParseResult<()> {
    let start = reader.absolute();
    let size = info
        .size
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingStreamSize).at(start))?;
    let raw = reader.read_bytes(size as usize)?.to_vec();

    match decode(raw, info.flags, scramble_key, resource) {
        Ok(data) => info.set_decoded(Ok(data)),
        Err(err) if err.category().aborts_document() => return Err(err.at(start)),
        Err(err) => {
            warn!("stream at {start:#x} could not be decoded: {err}");
            info.set_decoded(Err(err.at(start)));
        }
    }

    read_trailer(reader, policy)
}

fn read_trailer(reader: &mut ByteReader<'_>, policy: TrailerPolicy) -> ParseResult<()> {
    let at = reader.absolute();
    let found = reader.peek_bytes(2);
    match (policy, found) {
        (_, Some(bytes)) if bytes == TRAILER => {
            reader.read_bytes(2)?;
        }
        (TrailerPolicy::Consume, Some(bytes)) => {
            warn!("expected stream trailer at {at:#x}, found {bytes:02x?}");
            reader.read_bytes(2)?;
        }
        (TrailerPolicy::Consume, None) => {
            warn!("stream at {at:#x} ends without a trailer");
            reader.seek(reader.len())?;
        }
        (TrailerPolicy::Optional, _) => {
            debug!("no stream trailer at {at:#x}");
        }
        (TrailerPolicy::Strict, bytes) => {
            let mut found = [0u8; 2];
            if let Some(bytes) = bytes {
                found.copy_from_slice(bytes);
            }
            return Err(ParseError::new(ParseErrorKind::BadStreamTrailer(found)).at(at));
        }
    }
    Ok(())
}
