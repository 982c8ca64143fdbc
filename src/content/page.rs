//! Page layout streams.

use crate::document::ObjectTable;
use crate::error::{ParseErrorKind, ParseResult};
use crate::io::ByteReader;
use crate::object::{ObjectKind, ObjectRef};
use crate::schema::{POSITIONS, RULED_LINE_TYPES, lookup};
use crate::style::Color;
use crate::tag::{LINK, Tag, unpack};

/// Kinds a page may place.
const PLACEABLE: &[ObjectKind] = &[
    ObjectKind::Block,
    ObjectKind::Canvas,
    ObjectKind::Header,
    ObjectKind::Footer,
];

/// One entry of a page's content list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageItem {
    /// A placed Block, Canvas, Header or Footer.
    Object(ObjectRef),
    BlockSpace {
        xspace: u16,
        yspace: u16,
    },
    /// Anchor the next object at a fixed position (`topleft`, `base`, ...).
    Locate(&'static str),
    PageDiv {
        pain: u16,
        spacesize: u32,
        linewidth: u16,
        linecolor: Color,
    },
    RuledLine {
        linelength: u16,
        linetype: &'static str,
        linewidth: u16,
        linecolor: Color,
    },
    Wait(u16),
    SoundStop,
}

impl PageItem {
    pub fn name(&self) -> &'static str {
        match self {
            PageItem::Object(_) => "Object",
            PageItem::BlockSpace { .. } => "BlockSpace",
            PageItem::Locate(_) => "Locate",
            PageItem::PageDiv { .. } => "PageDiv",
            PageItem::RuledLine { .. } => "RuledLine",
            PageItem::Wait(_) => "Wait",
            PageItem::SoundStop => "SoundStop",
        }
    }
}

/// Pending spacing between placed objects.
#[derive(Debug, Default)]
struct Spacing {
    xspace: Option<u16>,
    yspace: Option<u16>,
    position: Option<&'static str>,
}

impl Spacing {
    /// Emit at most one item for the pending state and reset it.
    fn flush(&mut self, items: &mut Vec<PageItem>) {
        let pending = std::mem::take(self);
        if let Some(position) = pending.position {
            items.push(PageItem::Locate(position));
        } else if pending.xspace.is_some() || pending.yspace.is_some() {
            items.push(PageItem::BlockSpace {
                xspace: pending.xspace.unwrap_or(0),
                yspace: pending.yspace.unwrap_or(0),
            });
        }
    }
}

/// Build a page's content list from its decoded stream.
pub(crate) fn assemble(table: &ObjectTable, stream: &[u8]) -> ParseResult<Vec<PageItem>> {
    let mut reader = ByteReader::new(stream);
    let mut items = Vec::new();
    let mut spacing = Spacing::default();

    while !reader.at_end() {
        let tag = Tag::read(&mut reader)?;
        match tag.id {
            LINK => {
                spacing.flush(&mut items);
                let target = table
                    .resolve(tag.dword()?, PLACEABLE, "Block, Canvas, Header or Footer")
                    .map_err(|e| e.with_tag(tag.id).at(tag.offset))?;
                items.push(PageItem::Object(target));
            }
            0xF547 => spacing.xspace = Some(tag.word()?),
            0xF546 => spacing.yspace = Some(tag.word()?),
            0xF548 => {
                let raw = tag.word()?;
                let position = lookup(POSITIONS, raw).ok_or_else(|| {
                    tag.error(ParseErrorKind::BadValue {
                        attr: "position",
                        value: raw.into(),
                    })
                })?;
                spacing.position = Some(position);
            }
            0xF54E => {
                spacing.flush(&mut items);
                let v = unpack(tag.fixed(12)?, "HIHI");
                items.push(PageItem::PageDiv {
                    pain: v[0] as u16,
                    spacesize: v[1],
                    linewidth: v[2] as u16,
                    linecolor: Color::from_dword(v[3]),
                });
            }
            0xF573 => {
                spacing.flush(&mut items);
                let v = unpack(tag.fixed(10)?, "HHHI");
                let linetype = u16::try_from(v[1])
                    .ok()
                    .and_then(|code| lookup(RULED_LINE_TYPES, code))
                    .ok_or_else(|| {
                        tag.error(ParseErrorKind::BadValue {
                            attr: "linetype",
                            value: v[1],
                        })
                    })?;
                items.push(PageItem::RuledLine {
                    linelength: v[0] as u16,
                    linetype,
                    linewidth: v[2] as u16,
                    linecolor: Color::from_dword(v[3]),
                });
            }
            0xF5D4 => {
                spacing.flush(&mut items);
                items.push(PageItem::Wait(tag.word()?));
            }
            0xF5D6 => {
                spacing.flush(&mut items);
                items.push(PageItem::SoundStop);
            }
            _ => return Err(tag.error(ParseErrorKind::UnexpectedTag("page content"))),
        }
    }
    spacing.flush(&mut items);
    Ok(items)
}
