//! LRF file framing: the fixed header, the object index, and the
//! compressed metadata block with its thumbnail.

use byteorder::{ByteOrder, LittleEndian};

use crate::document::IndexEntry;
use crate::error::{Error, Result};
use crate::io::ByteSource;
use crate::stream::{ImageFormat, inflate_exact};
use crate::tag::OBJECT_START;

/// `"LRF"` in UTF-16LE, NUL padded.
pub const LRF_MAGIC: &[u8; 8] = b"L\0R\0F\0\0\0";

/// Bytes of header we decode.
pub const HEADER_SIZE: usize = 0x58;

const INDEX_ENTRY_SIZE: usize = 16;

/// Reading direction of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub enum Binding {
    /// Left to right.
    Lr,
    /// Right to left.
    Rl,
    Unknown(u8),
}

impl Binding {
    fn from_code(code: u8) -> Self {
        match code {
            1 => Binding::Lr,
            16 => Binding::Rl,
            other => Binding::Unknown(other),
        }
    }
}

/// The fixed-size header at the start of every LRF file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct LrfHeader {
    pub version: u16,
    pub xor_key: u16,
    pub root_object_id: u32,
    pub object_count: u64,
    pub index_offset: u64,
    pub binding: Binding,
    pub dpi: u16,
    pub width: u16,
    pub height: u16,
    pub color_depth: u8,
    pub toc_object_id: u32,
    pub toc_object_offset: u32,
    pub compressed_info_size: u16,
    pub thumbnail_type: u16,
    pub thumbnail_size: u32,
    pub uncompressed_info_size: u32,
}

impl LrfHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::InvalidLrf(format!(
                "header is {} bytes, need {HEADER_SIZE}",
                data.len()
            )));
        }
        if &data[..8] != LRF_MAGIC {
            return Err(Error::InvalidLrf("missing LRF magic".into()));
        }

        let u16_at = |at: usize| LittleEndian::read_u16(&data[at..]);
        let u32_at = |at: usize| LittleEndian::read_u32(&data[at..]);
        let u64_at = |at: usize| LittleEndian::read_u64(&data[at..]);

        Ok(Self {
            version: u16_at(0x08),
            xor_key: u16_at(0x0A),
            root_object_id: u32_at(0x0C),
            object_count: u64_at(0x10),
            index_offset: u64_at(0x18),
            binding: Binding::from_code(data[0x24]),
            dpi: u16_at(0x26),
            width: u16_at(0x2A),
            height: u16_at(0x2C),
            color_depth: data[0x2E],
            toc_object_id: u32_at(0x44),
            toc_object_offset: u32_at(0x48),
            compressed_info_size: u16_at(0x4C),
            thumbnail_type: u16_at(0x4E),
            thumbnail_size: u32_at(0x50),
            uncompressed_info_size: u32_at(0x54),
        })
    }

    /// Offset of the zlib metadata stream. Old files have a shorter header.
    pub fn info_start(&self) -> u64 {
        if self.version >= 800 { 0x58 } else { 0x53 }
    }

    /// Compressed metadata length. The stored size counts the
    /// uncompressed-size word that precedes the stream.
    fn info_len(&self) -> u64 {
        u64::from(self.compressed_info_size.saturating_sub(4))
    }

    pub fn thumbnail_offset(&self) -> u64 {
        self.info_start() + self.info_len()
    }

    pub fn thumbnail_format(&self) -> Option<ImageFormat> {
        ImageFormat::from_code(self.thumbnail_type)
    }
}

/// Read and inflate the metadata XML bytes.
pub fn read_info_bytes(source: &dyn ByteSource, header: &LrfHeader) -> Result<Option<Vec<u8>>> {
    if header.compressed_info_size == 0 {
        return Ok(None);
    }
    let raw = source.read_range(header.info_start(), header.info_len())?;
    let xml = inflate_exact(&raw, header.uncompressed_info_size)
        .map_err(|e| e.at(header.info_start()))?;
    Ok(Some(xml))
}

/// Read the cover thumbnail, if the file has one.
pub fn read_thumbnail(source: &dyn ByteSource, header: &LrfHeader) -> Result<Option<Vec<u8>>> {
    if header.thumbnail_size == 0 {
        return Ok(None);
    }
    let data = source.read_range(header.thumbnail_offset(), header.thumbnail_size.into())?;
    Ok(Some(data))
}

/// Read the object index.
///
/// Index records carry only id, offset and size; the type code comes from
/// the start tag of each object.
pub fn read_object_index(source: &dyn ByteSource, header: &LrfHeader) -> Result<Vec<IndexEntry>> {
    let count = usize::try_from(header.object_count)
        .ok()
        .filter(|count| count.saturating_mul(INDEX_ENTRY_SIZE) as u64 <= source.len())
        .ok_or_else(|| {
            Error::InvalidLrf(format!(
                "object count {} does not fit in the file",
                header.object_count
            ))
        })?;
    let index = source.read_range(header.index_offset, (count * INDEX_ENTRY_SIZE) as u64)?;

    let mut entries = Vec::with_capacity(count);
    for record in index.chunks_exact(INDEX_ENTRY_SIZE) {
        let object_id = LittleEndian::read_u32(record);
        let offset = u64::from(LittleEndian::read_u32(&record[4..]));
        let size = u64::from(LittleEndian::read_u32(&record[8..]));

        let start = source.read_range(offset, 8)?;
        if LittleEndian::read_u16(&start) != OBJECT_START {
            return Err(Error::InvalidLrf(format!(
                "object {object_id} at {offset:#x} does not begin with an object start tag"
            )));
        }
        entries.push(IndexEntry {
            object_id,
            type_code: LittleEndian::read_u16(&start[6..]),
            offset,
            size,
            scramble_key: header.xor_key,
        });
    }
    Ok(entries)
}
