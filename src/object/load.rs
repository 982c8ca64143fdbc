//! Phase one: decoding a single object record into an [`LrfObject`].

use byteorder::{ByteOrder, LittleEndian};

use super::{LrfObject, ObjectBody, ObjectKind};
use crate::document::{IndexEntry, ParseOptions};
use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::io::ByteReader;
use crate::schema::{AttrValue, Handler, Rule, WAIT_PROPS, empdots_attrs, find_rule, lookup};
use crate::stream::{self, StreamInfo};
use crate::tag::{OBJECT_END, OBJECT_START, Tag, unpack};

/// Size of the `F501` tag that closes every object.
const OBJECT_END_SIZE: usize = 2;

/// Decode one object from its bytes.
///
/// `data` must hold exactly the bytes the index entry points at.
pub(crate) fn load_object(
    data: &[u8],
    entry: &IndexEntry,
    kind: ObjectKind,
    options: &ParseOptions,
) -> ParseResult<LrfObject> {
    load(data, entry, kind, options).map_err(|e| e.in_object(entry.object_id))
}

fn load(
    data: &[u8],
    entry: &IndexEntry,
    kind: ObjectKind,
    options: &ParseOptions,
) -> ParseResult<LrfObject> {
    // Tags are read up to the end marker; a payload that would run into it
    // fails as a short read.
    let boundary = data
        .len()
        .checked_sub(OBJECT_END_SIZE)
        .filter(|&at| data[at..] == OBJECT_END.to_le_bytes())
        .ok_or_else(|| {
            let at = entry.offset + data.len().saturating_sub(OBJECT_END_SIZE) as u64;
            ParseError::new(ParseErrorKind::MissingObjectEnd).at(at)
        })?;
    let mut reader = ByteReader::with_base(&data[..boundary], entry.offset);

    let start = Tag::read(&mut reader)?;
    if start.id != OBJECT_START {
        return Err(start.error(ParseErrorKind::MissingObjectStart));
    }
    let header = start.fixed(6)?;
    let found_id = LittleEndian::read_u32(header);
    let found_type = LittleEndian::read_u16(&header[4..]);
    if found_id != entry.object_id || found_type != entry.type_code {
        return Err(start.error(ParseErrorKind::HeaderMismatch {
            expected_id: entry.object_id,
            expected_type: entry.type_code,
            found_id,
            found_type,
        }));
    }

    let mut object = LrfObject::new(entry.object_id, kind, entry.offset, entry.scramble_key);
    let tables = kind.tables();

    while !reader.at_end() {
        let tag = Tag::read(&mut reader)?;
        let rule = find_rule(tables, tag.id)
            .ok_or_else(|| tag.error(ParseErrorKind::UnexpectedTag(kind.name())))?;
        match rule {
            Rule::Ignore => {}
            Rule::Attr(name, decode) => {
                let value = decode.apply(name, &tag)?;
                object.attrs.insert(name, value);
            }
            Rule::Handle(handler) => object.handle(handler, &tag, &mut reader, options)?,
        }
    }

    Ok(object)
}

impl LrfObject {
    fn handle(
        &mut self,
        handler: Handler,
        tag: &Tag<'_>,
        reader: &mut ByteReader<'_>,
        options: &ParseOptions,
    ) -> ParseResult<()> {
        match (handler, &mut self.body) {
            (Handler::InfoLink, _) => self.info_link = Some(tag.dword()?),
            (Handler::StyleId, _) => self.style_id = Some(tag.dword()?),

            (Handler::StreamSize, _) => {
                self.stream.get_or_insert_with(StreamInfo::default).size = Some(tag.dword()?)
            }
            (Handler::StreamFlags, _) => {
                self.stream.get_or_insert_with(StreamInfo::default).flags = tag.word()?
            }
            (Handler::StreamBody, _) => {
                let info = self.stream.get_or_insert_with(StreamInfo::default);
                let resource = self.kind.is_resource();
                stream::read_body(reader, info, self.scramble_key, resource, options.trailer)?;
            }
            (Handler::StreamEnd, _) => {}

            (Handler::BgImage, _) => {
                let v = unpack(tag.fixed(6)?, "HI");
                self.attrs.insert("bgimagemode", AttrValue::Int(v[0].into()));
                self.attrs.insert("refbgimage", AttrValue::Int(v[1].into()));
            }
            (Handler::EmpDots, _) => self.attrs.extend(empdots_attrs(tag)),
            (Handler::CanvasWaits, _) => {
                let raw = tag.word()?;
                let prop = raw & 0x0F;
                let value = match lookup(WAIT_PROPS, prop) {
                    Some(name) => AttrValue::Name(name),
                    None => AttrValue::Int(prop.into()),
                };
                self.attrs.insert("setwaitprop", value);
                self.attrs
                    .insert("setwaitsync", AttrValue::Int((raw & 0xF0).into()));
            }

            (Handler::PageList, ObjectBody::PageTree(pages)) => pages.extend_from_slice(tag.ids()?),
            (Handler::ObjectList, ObjectBody::Page(page)) => {
                page.object_list.extend_from_slice(tag.ids()?)
            }
            (Handler::ParentPageTree, ObjectBody::Page(page)) => page.parent = Some(tag.dword()?),

            (Handler::PageTreeId, ObjectBody::BookAttr(book)) => {
                book.page_tree = Some(tag.dword()?)
            }
            (Handler::FontLink, ObjectBody::BookAttr(book)) => book.fonts.push(tag.dword()?),

            (Handler::ImageRect, ObjectBody::Image(image)) => {
                let v = unpack(tag.fixed(8)?, "HHHH");
                (image.x0, image.y0, image.x1, image.y1) =
                    (v[0] as u16, v[1] as u16, v[2] as u16, v[3] as u16);
            }
            (Handler::ImageSize, ObjectBody::Image(image)) => {
                let v = unpack(tag.fixed(4)?, "HH");
                (image.xsize, image.ysize) = (v[0] as u16, v[1] as u16);
            }
            (Handler::RefStream, ObjectBody::Image(image)) => image.refstream = Some(tag.dword()?),

            (handler, ObjectBody::Button(button)) => button.handle(handler, tag, reader)?,

            _ => {
                return Err(ParseError::new(ParseErrorKind::UnexpectedTag(self.kind.name()))
                    .with_tag(tag.id)
                    .at(tag.offset));
            }
        }
        Ok(())
    }
}
