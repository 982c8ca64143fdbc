use crate::error::{ParseErrorKind, ParseResult};
use crate::schema::{self, TagSpec};

/// Object classes, by their type code in the object header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ObjectKind {
    PageTree = 0x01,
    Page = 0x02,
    Header = 0x03,
    Footer = 0x04,
    PageAttr = 0x05,
    Block = 0x06,
    BlockAttr = 0x07,
    MiniPage = 0x08,
    Text = 0x0A,
    TextAttr = 0x0B,
    Image = 0x0C,
    Canvas = 0x0D,
    ESound = 0x0E,
    ImageStream = 0x11,
    Import = 0x12,
    Button = 0x13,
    Window = 0x14,
    PopUpWin = 0x15,
    Sound = 0x16,
    SoundStream = 0x17,
    Font = 0x19,
    ObjectInfo = 0x1A,
    BookAttr = 0x1C,
    SimpleText = 0x1D,
    Toc = 0x1E,
}

/// Highest type code in the type table.
pub const MAX_TYPE_CODE: u16 = 0x1E;

impl ObjectKind {
    /// Classify a type code.
    ///
    /// Returns `Ok(None)` for the reserved slots of the type table, which
    /// are skipped, and an error for codes past the end of the table.
    pub fn from_code(code: u16) -> ParseResult<Option<Self>> {
        use ObjectKind::*;
        let kind = match code {
            0x01 => PageTree,
            0x02 => Page,
            0x03 => Header,
            0x04 => Footer,
            0x05 => PageAttr,
            0x06 => Block,
            0x07 => BlockAttr,
            0x08 => MiniPage,
            0x0A => Text,
            0x0B => TextAttr,
            0x0C => Image,
            0x0D => Canvas,
            0x0E => ESound,
            0x11 => ImageStream,
            0x12 => Import,
            0x13 => Button,
            0x14 => Window,
            0x15 => PopUpWin,
            0x16 => Sound,
            0x17 => SoundStream,
            0x19 => Font,
            0x1A => ObjectInfo,
            0x1C => BookAttr,
            0x1D => SimpleText,
            0x1E => Toc,
            0x00 | 0x09 | 0x0F | 0x10 | 0x18 | 0x1B => return Ok(None),
            _ => return Err(ParseErrorKind::UnknownObjectType(code).into()),
        };
        Ok(Some(kind))
    }

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        use ObjectKind::*;
        match self {
            PageTree => "PageTree",
            Page => "Page",
            Header => "Header",
            Footer => "Footer",
            PageAttr => "PageAttr",
            Block => "Block",
            BlockAttr => "BlockAttr",
            MiniPage => "MiniPage",
            Text => "Text",
            TextAttr => "TextAttr",
            Image => "Image",
            Canvas => "Canvas",
            ESound => "ESound",
            ImageStream => "ImageStream",
            Import => "Import",
            Button => "Button",
            Window => "Window",
            PopUpWin => "PopUpWin",
            Sound => "Sound",
            SoundStream => "SoundStream",
            Font => "Font",
            ObjectInfo => "ObjectInfo",
            BookAttr => "BookAttr",
            SimpleText => "SimpleText",
            Toc => "TOCObject",
        }
    }

    /// Tag tables this kind accepts, searched in order.
    pub fn tables(self) -> &'static [&'static [TagSpec]] {
        use ObjectKind::*;
        use schema::*;
        match self {
            PageTree => &[BASE, PAGE_TREE],
            Page => &[BASE, PAGE_FIELDS, PAGE_ATTR, STREAM],
            Header | Footer | Canvas => &[BASE, CANVAS, STREAM],
            PageAttr => &[BASE, PAGE_ATTR],
            Block => &[BASE, LINKED_STYLE, BLOCK_ATTR, TEXT_ATTR, STREAM],
            BlockAttr => &[BASE, BLOCK_ATTR],
            MiniPage => &[BASE, MINI_PAGE, STREAM],
            Text | SimpleText => &[BASE, LINKED_STYLE, TEXT_ATTR, RUBY, STREAM],
            TextAttr => &[BASE, TEXT_ATTR],
            Image => &[BASE, IMAGE],
            ImageStream => &[BASE, IMAGE_STREAM, STREAM],
            Font => &[BASE, FONT, STREAM],
            SoundStream | Import | ObjectInfo | Toc => &[BASE, STREAM],
            Button => &[BASE, BUTTON],
            BookAttr => &[BASE, BOOK_ATTR, RUBY],
            ESound | Sound | Window | PopUpWin => &[BASE],
        }
    }

    /// Streams of these kinds are only scrambled in their first kilobyte.
    pub fn is_resource(self) -> bool {
        matches!(
            self,
            ObjectKind::ImageStream | ObjectKind::Font | ObjectKind::SoundStream
        )
    }

    /// Attribute-only objects that other objects link to for their defaults.
    pub fn is_style(self) -> bool {
        matches!(
            self,
            ObjectKind::PageAttr | ObjectKind::BlockAttr | ObjectKind::TextAttr | ObjectKind::BookAttr
        )
    }

    /// Whether objects of this kind keep their decoded stream after initialization.
    pub fn keeps_stream(self) -> bool {
        self.is_resource() || matches!(self, ObjectKind::Import | ObjectKind::ObjectInfo)
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
