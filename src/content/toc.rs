use crate::document::ObjectTable;
use crate::error::ParseResult;
use crate::io::ByteReader;
use crate::object::{ObjectKind, ObjectRef};
use crate::util::decode_utf16le;

/// One table-of-contents label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub page: ObjectRef,
    pub object: ObjectRef,
    pub label: String,
}

/// Decode a TOC stream.
///
/// Layout: a u16 entry count, an offset table of `count + 1` dwords
/// (counting the slot the count sits in), then the entries themselves.
pub(crate) fn assemble(table: &ObjectTable, stream: &[u8]) -> ParseResult<Vec<TocEntry>> {
    if stream.is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = ByteReader::new(stream);
    let count = reader.read_u16()? as usize;
    reader.seek(4 * (count + 1))?;

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let offset = reader.absolute();
        let page = reader.read_u32()?;
        let object = reader.read_u32()?;
        let len = reader.read_u16()? as usize;
        let label = decode_utf16le(reader.read_bytes(len)?);
        entries.push(TocEntry {
            page: table
                .resolve(page, &[ObjectKind::Page], "Page")
                .map_err(|e| e.at(offset))?,
            object: table
                .resolve(object, &[], "any object")
                .map_err(|e| e.at(offset))?,
            label,
        });
    }
    Ok(entries)
}
