use crate::document::ObjectTable;
use crate::error::{ParseErrorKind, ParseResult};
use crate::io::ByteReader;
use crate::object::{Image, ObjectKind, ObjectRef};
use crate::tag::{LINK, Tag};

const BLOCK_CONTENT: &[ObjectKind] = &[
    ObjectKind::Text,
    ObjectKind::SimpleText,
    ObjectKind::Image,
    ObjectKind::Button,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    TextBlock,
    SimpleTextBlock,
    ImageBlock,
    ButtonBlock,
}

impl BlockKind {
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::TextBlock => "TextBlock",
            BlockKind::SimpleTextBlock => "SimpleTextBlock",
            BlockKind::ImageBlock => "ImageBlock",
            BlockKind::ButtonBlock => "ButtonBlock",
        }
    }
}

/// The object a Block wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContent {
    pub kind: BlockKind,
    pub content: ObjectRef,
    /// TextAttr of the wrapped text object.
    pub text_style: Option<u32>,
    /// Geometry copied from the wrapped Image.
    pub image: Option<Image>,
}

/// Resolve the inner object named by the first tag of a block stream.
pub(crate) fn resolve(table: &ObjectTable, stream: &[u8]) -> ParseResult<BlockContent> {
    let mut reader = ByteReader::new(stream);
    let tag = Tag::read(&mut reader)?;
    if tag.id != LINK {
        return Err(tag.error(ParseErrorKind::UnexpectedTag("block content")));
    }

    let content = table
        .resolve(tag.dword()?, BLOCK_CONTENT, "Text, SimpleText, Image or Button")
        .map_err(|e| e.with_tag(tag.id).at(tag.offset))?;
    let inner = table.object(content);
    let kind = match inner.kind {
        ObjectKind::Text => BlockKind::TextBlock,
        ObjectKind::SimpleText => BlockKind::SimpleTextBlock,
        ObjectKind::Image => BlockKind::ImageBlock,
        _ => BlockKind::ButtonBlock,
    };

    Ok(BlockContent {
        kind,
        content,
        text_style: match kind {
            BlockKind::TextBlock | BlockKind::SimpleTextBlock => inner.style_id,
            _ => None,
        },
        image: inner.image().copied(),
    })
}
