use log::warn;

use crate::document::ObjectTable;
use crate::error::ParseResult;
use crate::io::ByteReader;
use crate::object::ObjectRef;
use crate::tag::{Tag, unpack};

const PUT_OBJ: u16 = 0xF549;

/// An object placed at fixed coordinates on a canvas, header or footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PutObj {
    pub x: u16,
    pub y: u16,
    pub target: ObjectRef,
}

pub(crate) fn assemble(table: &ObjectTable, stream: &[u8]) -> ParseResult<Vec<PutObj>> {
    let mut reader = ByteReader::new(stream);
    let mut items = Vec::new();
    while !reader.at_end() {
        let tag = Tag::read(&mut reader)?;
        if tag.id != PUT_OBJ {
            warn!("skipping tag {:#06X} in canvas stream at {:#x}", tag.id, tag.offset);
            continue;
        }
        let v = unpack(tag.fixed(8)?, "HHI");
        let target = table
            .resolve(v[2], &[], "any object")
            .map_err(|e| e.with_tag(tag.id).at(tag.offset))?;
        items.push(PutObj {
            x: v[0] as u16,
            y: v[1] as u16,
            target,
        });
    }
    Ok(items)
}
