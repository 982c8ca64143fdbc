//! LRS-XML: the XML form of an LRF object graph.
//!
//! Pages are written in reading order under `Main` with their blocks
//! inline. Objects not reached from a page (canvas contents, unplaced
//! blocks, image streams) are written under `Objects`. Attribute names are
//! the names of the tags they were decoded from.

use std::collections::HashSet;

use super::xml::{Attrs, XmlWriter, attr};
use super::{ExportConfig, printable_text};
use crate::content::{BlockKind, PageItem};
use crate::document::Document;
use crate::error::Result;
use crate::header::Binding;
use crate::info::BookInfo;
use crate::object::{ButtonAction, LrfObject, ObjectKind};
use crate::text::Node;

/// Kinds listed under `Objects` unless already written inside a page.
const STANDALONE: &[ObjectKind] = &[
    ObjectKind::Block,
    ObjectKind::Text,
    ObjectKind::SimpleText,
    ObjectKind::Image,
    ObjectKind::ImageStream,
    ObjectKind::Canvas,
    ObjectKind::Header,
    ObjectKind::Footer,
    ObjectKind::Button,
];

/// Serialize the whole document as LRS-XML.
pub fn to_lrs(doc: &Document, config: &ExportConfig) -> Result<String> {
    let mut lrs = LrsWriter::new(doc, config);
    lrs.document()?;
    Ok(lrs.w.finish())
}

/// Serialize a single object as an LRS element.
pub fn object_to_lrs(doc: &Document, object: &LrfObject, config: &ExportConfig) -> Result<String> {
    let mut lrs = LrsWriter::new(doc, config);
    lrs.object(object)?;
    Ok(lrs.w.finish())
}

struct LrsWriter<'a> {
    doc: &'a Document,
    w: XmlWriter,
    traversed: HashSet<u32>,
}

impl<'a> LrsWriter<'a> {
    fn new(doc: &'a Document, config: &ExportConfig) -> Self {
        Self {
            doc,
            w: XmlWriter::new(config.pretty),
            traversed: HashSet::new(),
        }
    }

    fn document(&mut self) -> Result<()> {
        self.w.declaration();
        self.w.start("BBeBXylog", &[attr("version", "1.0")]);
        self.book_information();
        self.main()?;
        self.w.empty("Template", &[attr("version", "1.0")]);
        self.styles();
        self.objects()?;
        self.toc();
        self.w.end();
        Ok(())
    }

    fn book_information(&mut self) {
        let info = self.doc.info().cloned().unwrap_or_default();
        let BookInfo {
            title,
            title_reading,
            author,
            author_reading,
            book_id,
            publisher,
            label,
            category,
            classification,
            free_text,
            language,
            creator,
            creation_date,
            producer,
            page_count,
        } = info;
        let w = &mut self.w;

        w.start("BookInformation", &[]);
        w.start("Info", &[attr("version", "1.1")]);
        w.start("BookInfo", &[]);
        w.text_element("Title", &[attr("reading", title_reading.unwrap_or_default())], &title);
        w.text_element("Author", &[attr("reading", author_reading.unwrap_or_default())], &author);
        for (name, value) in [
            ("BookID", book_id),
            ("Publisher", publisher),
            ("Label", label),
            ("Category", category),
            ("Classification", classification),
            ("FreeText", free_text),
        ] {
            w.text_element(name, &[], &value.unwrap_or_default());
        }
        w.end();

        w.start("DocInfo", &[]);
        for (name, value) in [
            ("Language", language),
            ("Creator", creator),
            ("CreationDate", creation_date),
            ("Producer", producer),
        ] {
            w.text_element(name, &[], &value.unwrap_or_default());
        }
        let pages = page_count.unwrap_or(self.doc.pages().len() as u32);
        w.text_element("SumPage", &[], &pages.to_string());
        w.end();
        w.end();
        w.end();
    }

    /// The root page tree's pages. Other trees go under Objects.
    fn main(&mut self) -> Result<()> {
        let doc = self.doc;
        self.w.start("Main", &[]);
        if let Some(root) = doc.root_page_tree() {
            root.check()?;
            self.traversed.insert(root.id);
            for page in doc.tree_pages(root) {
                self.object(page)?;
            }
        }
        self.w.end();
        Ok(())
    }

    fn page_tree(&mut self, tree: &LrfObject) -> Result<()> {
        let mut attrs = vec![attr("objid", tree.id)];
        attrs.extend(plain_attrs(tree));
        let pages = self.doc.tree_pages(tree);
        if pages.is_empty() {
            self.w.empty("PageTree", &attrs);
            return Ok(());
        }
        self.w.start("PageTree", &attrs);
        for page in pages {
            self.object(page)?;
        }
        self.w.end();
        Ok(())
    }

    fn styles(&mut self) {
        let doc = self.doc;
        self.w.start("Style", &[]);
        for book in doc.objects_of(ObjectKind::BookAttr) {
            self.book_style(book);
        }
        for kind in [ObjectKind::TextAttr, ObjectKind::BlockAttr, ObjectKind::PageAttr] {
            for style in doc.objects_of(kind) {
                self.style(style);
            }
        }
        self.w.end();
    }

    fn book_style(&mut self, book: &LrfObject) {
        let doc = self.doc;
        let id = book.id;
        self.w
            .start("BookStyle", &[attr("objid", id), attr("stylelabel", id)]);
        self.w.empty("SetDefault", &plain_attrs(book));

        if let Some(header) = doc.header() {
            let binding = match header.binding {
                Binding::Rl => "Rl".to_owned(),
                Binding::Lr => "Lr".to_owned(),
                Binding::Unknown(code) => code.to_string(),
            };
            self.w.empty(
                "BookSetting",
                &[
                    attr("bindingdirection", binding),
                    attr("dpi", header.dpi),
                    attr("screenwidth", header.width),
                    attr("screenheight", header.height),
                    attr("colordepth", header.color_depth),
                ],
            );
        }

        for font in book
            .book_attr()
            .into_iter()
            .flat_map(|attrs| &attrs.fonts)
            .filter_map(|&id| doc.get(id))
        {
            self.regist_font(font);
        }
        self.w.end();
    }

    fn regist_font(&mut self, font: &LrfObject) {
        let mut attrs = vec![attr("objid", font.id)];
        attrs.extend(plain_attrs(font));
        if let Some(file) = font.file_name() {
            attrs.push(attr("file", file));
        }
        attrs.push(attr("encoding", "TTF"));
        self.w.empty("RegistFont", &attrs);
        self.traversed.insert(font.id);
    }

    fn style(&mut self, style: &LrfObject) {
        let name = match style.kind {
            ObjectKind::TextAttr => "TextStyle",
            ObjectKind::BlockAttr => "BlockStyle",
            _ => "PageStyle",
        };
        let mut attrs = vec![attr("objid", style.id), attr("stylelabel", style.id)];
        attrs.extend(plain_attrs(style));
        self.w.empty(name, &attrs);
    }

    fn objects(&mut self) -> Result<()> {
        let doc = self.doc;
        self.w.start("Objects", &[]);
        // Secondary trees first, so their blocks are written inside their pages.
        for tree in doc.page_trees() {
            if !self.traversed.contains(&tree.id) {
                self.object(tree)?;
            }
        }
        for object in doc.objects() {
            if STANDALONE.contains(&object.kind) && !self.traversed.contains(&object.id) {
                self.object(object)?;
            }
        }
        self.w.end();
        Ok(())
    }

    fn toc(&mut self) {
        let entries = self.doc.toc();
        if entries.is_empty() {
            return;
        }
        self.w.start("TOC", &[]);
        for entry in entries {
            self.w.text_element(
                "TocLabel",
                &[attr("refpage", entry.page.id), attr("refobj", entry.object.id)],
                &entry.label,
            );
        }
        self.w.end();
    }

    // ------------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------------

    fn object(&mut self, object: &LrfObject) -> Result<()> {
        object.check()?;
        self.traversed.insert(object.id);
        match object.kind {
            ObjectKind::PageTree => self.page_tree(object)?,
            ObjectKind::Page => self.page(object)?,
            ObjectKind::Block => self.block(object)?,
            ObjectKind::Text | ObjectKind::SimpleText => {
                let mut attrs = vec![attr("objid", object.id)];
                if let Some(style) = object.style_id {
                    attrs.push(attr("textstyle", style));
                }
                attrs.extend(plain_attrs(object));
                self.text(object.kind.name(), attrs, object)?;
            }
            ObjectKind::Canvas | ObjectKind::Header | ObjectKind::Footer => self.canvas(object),
            ObjectKind::Image => {
                let mut attrs = vec![attr("objid", object.id)];
                if let Some(image) = object.image() {
                    attrs.extend([
                        attr("x0", image.x0),
                        attr("y0", image.y0),
                        attr("x1", image.x1),
                        attr("y1", image.y1),
                        attr("xsize", image.xsize),
                        attr("ysize", image.ysize),
                    ]);
                    if let Some(stream) = image.refstream {
                        attrs.push(attr("refstream", stream));
                    }
                }
                attrs.extend(plain_attrs(object));
                self.w.empty("Image", &attrs);
            }
            ObjectKind::ImageStream => {
                let mut attrs = vec![attr("objid", object.id)];
                if let Some(format) = object.image_format() {
                    attrs.push(attr("encoding", format.name()));
                }
                if let Some(file) = object.file_name() {
                    attrs.push(attr("file", file));
                }
                attrs.extend(plain_attrs(object));
                self.w.empty("ImageStream", &attrs);
            }
            ObjectKind::Button => self.button(object),
            ObjectKind::TextAttr | ObjectKind::BlockAttr | ObjectKind::PageAttr => {
                self.style(object)
            }
            ObjectKind::BookAttr => self.book_style(object),
            ObjectKind::Font => self.regist_font(object),
            kind => {
                let mut attrs = vec![attr("objid", object.id)];
                attrs.extend(plain_attrs(object));
                self.w.empty(kind.name(), &attrs);
            }
        }
        Ok(())
    }

    fn page(&mut self, page: &LrfObject) -> Result<()> {
        let doc = self.doc;
        let mut attrs = vec![attr("objid", page.id)];
        if let Some(style) = page.style_id {
            attrs.push(attr("pagestyle", style));
        }
        attrs.extend(plain_attrs(page));

        let items = page.page().map(|p| p.content.as_slice()).unwrap_or_default();
        if items.is_empty() {
            self.w.empty("Page", &attrs);
            return Ok(());
        }
        self.w.start("Page", &attrs);
        for item in items {
            match item {
                PageItem::Object(target) => self.object(doc.table().object(*target))?,
                PageItem::BlockSpace { xspace, yspace } => self.w.empty(
                    "BlockSpace",
                    &[attr("xspace", xspace), attr("yspace", yspace)],
                ),
                PageItem::Locate(position) => self.w.empty("Locate", &[attr("pos", position)]),
                PageItem::PageDiv {
                    pain,
                    spacesize,
                    linewidth,
                    linecolor,
                } => self.w.empty(
                    "PageDiv",
                    &[
                        attr("pain", pain),
                        attr("spacesize", spacesize),
                        attr("linewidth", linewidth),
                        attr("linecolor", linecolor),
                    ],
                ),
                PageItem::RuledLine {
                    linelength,
                    linetype,
                    linewidth,
                    linecolor,
                } => self.w.empty(
                    "RuledLine",
                    &[
                        attr("linelength", linelength),
                        attr("linetype", linetype),
                        attr("linewidth", linewidth),
                        attr("linecolor", linecolor),
                    ],
                ),
                PageItem::Wait(time) => self.w.empty("Wait", &[attr("time", time)]),
                PageItem::SoundStop => self.w.empty("SoundStop", &[]),
            }
        }
        self.w.end();
        Ok(())
    }

    fn block(&mut self, block: &LrfObject) -> Result<()> {
        let doc = self.doc;
        let mut attrs = vec![attr("objid", block.id)];
        if let Some(style) = block.style_id {
            attrs.push(attr("blockstyle", style));
        }

        let Some(content) = block.block() else {
            attrs.extend(plain_attrs(block));
            self.w.empty("Block", &attrs);
            return Ok(());
        };
        let inner = doc.table().object(content.content);
        inner.check()?;
        self.traversed.insert(inner.id);

        match content.kind {
            BlockKind::TextBlock | BlockKind::SimpleTextBlock => {
                if let Some(style) = content.text_style {
                    attrs.push(attr("textstyle", style));
                }
                attrs.extend(plain_attrs(block));
                self.text(content.kind.name(), attrs, inner)?;
            }
            BlockKind::ImageBlock => {
                if let Some(image) = &content.image {
                    attrs.extend([
                        attr("x0", image.x0),
                        attr("y0", image.y0),
                        attr("x1", image.x1),
                        attr("y1", image.y1),
                        attr("xsize", image.xsize),
                        attr("ysize", image.ysize),
                    ]);
                    if let Some(stream) = image.refstream {
                        attrs.push(attr("refstream", stream));
                    }
                }
                attrs.push(attr("refobj", inner.id));
                attrs.extend(plain_attrs(block));
                self.w.empty("ImageBlock", &attrs);
            }
            BlockKind::ButtonBlock => {
                attrs.extend(plain_attrs(block));
                self.w.start("ButtonBlock", &attrs);
                self.button(inner);
                self.w.end();
            }
        }
        Ok(())
    }

    /// Write `name` wrapping the text content of `text`.
    fn text(&mut self, name: &str, attrs: Attrs, text: &LrfObject) -> Result<()> {
        let nodes = printable_text(text)?;
        self.w.inline(name, &attrs);
        write_nodes(&mut self.w, nodes);
        self.w.end();
        Ok(())
    }

    fn canvas(&mut self, canvas: &LrfObject) {
        let mut attrs = vec![attr("objid", canvas.id)];
        attrs.extend(plain_attrs(canvas));
        let puts = canvas.canvas().unwrap_or_default();
        if puts.is_empty() {
            self.w.empty(canvas.kind.name(), &attrs);
            return;
        }
        self.w.start(canvas.kind.name(), &attrs);
        for put in puts {
            self.w.empty(
                "PutObj",
                &[attr("x1", put.x), attr("y1", put.y), attr("refobj", put.target.id)],
            );
        }
        self.w.end();
    }

    fn button(&mut self, object: &LrfObject) {
        self.traversed.insert(object.id);
        let mut attrs = vec![attr("objid", object.id)];
        attrs.extend(plain_attrs(object));
        let Some(button) = object.button() else {
            self.w.empty("Button", &attrs);
            return;
        };
        if button.flags != 0 {
            attrs.push(attr("flags", format!("0x{:04x}", button.flags)));
        }

        self.w.start("Button", &attrs);
        for (state, data) in &button.states {
            let state_attrs: Attrs = data
                .refimage
                .map(|image| attr("refimage", image))
                .into_iter()
                .collect();
            self.w.start(state.lrs_name(), &state_attrs);
            for action in &data.actions {
                match action {
                    ButtonAction::JumpTo { page, object } => self.w.empty(
                        "JumpTo",
                        &[attr("refpage", page), attr("refobj", object)],
                    ),
                    ButtonAction::SendMessage {
                        kind,
                        first,
                        second,
                    } => self.w.empty(
                        "SendMessage",
                        &[
                            attr("type", kind),
                            attr("param1", first),
                            attr("param2", second),
                        ],
                    ),
                    ButtonAction::CloseWindow => self.w.empty("CloseWindow", &[]),
                    ButtonAction::SoundStop => self.w.empty("SoundStop", &[]),
                    ButtonAction::Run { kind, object } => {
                        self.w
                            .empty("Run", &[attr("type", kind), attr("refobj", object)])
                    }
                }
            }
            self.w.end();
        }
        self.w.end();
    }
}

/// Decoded attributes of `object` in tag order.
fn plain_attrs(object: &LrfObject) -> Attrs {
    object
        .attrs
        .iter()
        .map(|(name, value)| (*name, value.to_string()))
        .collect()
}

/// Write interpreted text, closing anything left open.
fn write_nodes(w: &mut XmlWriter, nodes: &[Node]) {
    let mut depth = 0usize;
    for node in nodes {
        match node {
            Node::Text(text) => w.text(text),
            Node::Open(tag) => {
                let attrs: Attrs = tag
                    .attrs
                    .iter()
                    .map(|(name, value)| (*name, value.to_string()))
                    .collect();
                if tag.self_closing {
                    w.empty(tag.name, &attrs);
                } else {
                    w.inline(tag.name, &attrs);
                    depth += 1;
                }
            }
            Node::Close => {
                if depth > 0 {
                    w.end();
                    depth -= 1;
                }
            }
        }
    }
    for _ in 0..depth {
        w.end();
    }
}
