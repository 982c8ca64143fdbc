//! The LRF object model.
//!
//! Every record in an LRF file is an object with an id, a kind, a set of
//! named attributes, an optional embedded stream, and a kind-specific body.
//! Bodies of pages, blocks, canvases, text and TOC objects start out empty
//! and are filled in by [`crate::content`] once every object is loaded.

mod button;
mod kind;
mod load;
mod refs;

pub use button::{Button, ButtonAction, ButtonState, ButtonStateData};
pub use kind::{MAX_TYPE_CODE, ObjectKind};
pub use refs::Reference;

pub(crate) use load::load_object;

use crate::content::{BlockContent, PageItem, PutObj, TocEntry};
use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::schema::{AttrValue, Attributes};
use crate::stream::{ImageFormat, StreamInfo};
use crate::text::Node;
use crate::util::sanitize_file_name;

/// A resolved link: the target id and its slot in the object table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub id: u32,
    pub slot: usize,
}

/// Geometry and pixel source of an Image object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Image {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
    pub xsize: u16,
    pub ysize: u16,
    pub refstream: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub parent: Option<u32>,
    pub object_list: Vec<u32>,
    pub content: Vec<PageItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookAttr {
    pub page_tree: Option<u32>,
    pub fonts: Vec<u32>,
}

/// Kind-specific part of an object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectBody {
    Plain,
    PageTree(Vec<u32>),
    Page(Page),
    Canvas(Vec<PutObj>),
    Block(Option<BlockContent>),
    Text(Vec<Node>),
    Image(Image),
    Button(Button),
    BookAttr(BookAttr),
    Toc(Vec<TocEntry>),
}

impl ObjectBody {
    fn for_kind(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::PageTree => ObjectBody::PageTree(Vec::new()),
            ObjectKind::Page => ObjectBody::Page(Page::default()),
            ObjectKind::Canvas | ObjectKind::Header | ObjectKind::Footer => {
                ObjectBody::Canvas(Vec::new())
            }
            ObjectKind::Block => ObjectBody::Block(None),
            ObjectKind::Text | ObjectKind::SimpleText => ObjectBody::Text(Vec::new()),
            ObjectKind::Image => ObjectBody::Image(Image::default()),
            ObjectKind::Button => ObjectBody::Button(Button::default()),
            ObjectKind::BookAttr => ObjectBody::BookAttr(BookAttr::default()),
            ObjectKind::Toc => ObjectBody::Toc(Vec::new()),
            _ => ObjectBody::Plain,
        }
    }
}

/// One decoded object.
#[derive(Debug, Clone)]
pub struct LrfObject {
    pub id: u32,
    pub kind: ObjectKind,
    /// Absolute file offset of the object start tag.
    pub offset: u64,
    pub scramble_key: u16,
    pub info_link: Option<u32>,
    /// Linked style object (`F503`), for pages, blocks and text.
    pub style_id: Option<u32>,
    pub attrs: Attributes,
    pub stream: Option<StreamInfo>,
    pub body: ObjectBody,
    error: Option<ParseError>,
}

impl LrfObject {
    pub fn new(id: u32, kind: ObjectKind, offset: u64, scramble_key: u16) -> Self {
        Self {
            id,
            kind,
            offset,
            scramble_key,
            info_link: None,
            style_id: None,
            attrs: Attributes::new(),
            stream: None,
            body: ObjectBody::for_kind(kind),
            error: None,
        }
    }

    /// The content or resource error that poisoned this object, if any.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Re-raise a stored error.
    pub fn check(&self) -> ParseResult<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub(crate) fn poison(&mut self, err: ParseError) {
        log::warn!("{} {} is unusable: {err}", self.kind, self.id);
        self.error = Some(err.in_object(self.id));
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    /// Decoded stream bytes.
    pub fn stream_data(&self) -> ParseResult<&[u8]> {
        self.check()?;
        self.stream
            .as_ref()
            .ok_or_else(|| ParseError::new(ParseErrorKind::MissingStream))
            .and_then(StreamInfo::data)
            .map_err(|e| e.in_object(self.id))
    }

    /// Text nodes of a Text or SimpleText object.
    pub fn text_nodes(&self) -> ParseResult<&[Node]> {
        self.check()?;
        match &self.body {
            ObjectBody::Text(nodes) => Ok(nodes),
            _ => Err(ParseError::new(ParseErrorKind::WrongReferenceKind {
                id: self.id,
                found: self.kind.name(),
                expected: "Text",
            })),
        }
    }

    pub fn page(&self) -> Option<&Page> {
        match &self.body {
            ObjectBody::Page(page) => Some(page),
            _ => None,
        }
    }

    pub fn page_tree(&self) -> Option<&[u32]> {
        match &self.body {
            ObjectBody::PageTree(pages) => Some(pages),
            _ => None,
        }
    }

    pub fn block(&self) -> Option<&BlockContent> {
        match &self.body {
            ObjectBody::Block(content) => content.as_ref(),
            _ => None,
        }
    }

    pub fn canvas(&self) -> Option<&[PutObj]> {
        match &self.body {
            ObjectBody::Canvas(items) => Some(items),
            _ => None,
        }
    }

    /// Format of an image stream: flagged, or recognised from its data.
    pub fn image_format(&self) -> Option<ImageFormat> {
        let stream = self.stream.as_ref()?;
        stream
            .image_format()
            .or_else(|| stream.data().ok().and_then(ImageFormat::sniff))
    }

    /// Name an image stream or font is written under when extracted.
    ///
    /// LRS `file` attributes and HTML `src` attributes use the same name.
    pub fn file_name(&self) -> Option<String> {
        match self.kind {
            ObjectKind::ImageStream => {
                Some(format!("{}.{}", self.id, self.image_format()?.extension()))
            }
            ObjectKind::Font => {
                let face = self
                    .attr("fontfacename")
                    .and_then(AttrValue::as_text)
                    .map(sanitize_file_name)
                    .unwrap_or_else(|| format!("font{}", self.id));
                Some(format!("{face}.ttf"))
            }
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&Image> {
        match &self.body {
            ObjectBody::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn button(&self) -> Option<&Button> {
        match &self.body {
            ObjectBody::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn book_attr(&self) -> Option<&BookAttr> {
        match &self.body {
            ObjectBody::BookAttr(book) => Some(book),
            _ => None,
        }
    }

    pub fn toc(&self) -> Option<&[TocEntry]> {
        match &self.body {
            ObjectBody::Toc(entries) => Some(entries),
            _ => None,
        }
    }
}
