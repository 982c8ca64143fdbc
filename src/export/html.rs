//! HTML rendering of the text on each page.
//!
//! Each page becomes a `<div class="page">`. Text blocks carry their style
//! classes from [`generate_css`] plus an inline `style` for attributes set
//! on the block or text object itself. Image blocks link to the file names
//! used when resources are extracted.

use log::debug;

use super::css_gen::{CssArtifact, generate_css};
use super::xml::{Attrs, XmlWriter, attr};
use super::{ExportConfig, printable_text};
use crate::content::{BlockKind, PageItem};
use crate::document::Document;
use crate::error::Result;
use crate::object::{LrfObject, ObjectKind};
use crate::style::{BlockCss, FontFaceMap, TextCss, ToCss};
use crate::text::{Node, TextTag};

/// Render the whole document as an HTML page.
pub fn to_html(doc: &Document, config: &ExportConfig) -> Result<String> {
    let css = generate_css(doc, &config.font_map);
    let mut html = HtmlWriter::new(doc, config, &css);

    html.w.raw("<!DOCTYPE html>");
    if config.pretty {
        html.w.raw("\n");
    }
    html.w.start("html", &[]);
    html.w.start("head", &[]);
    html.w.empty("meta", &[attr("charset", "utf-8")]);
    let title = doc.info().map(|info| info.title.as_str()).unwrap_or_default();
    html.w.text_element("title", &[], title);
    if !css.is_empty() {
        html.w.inline("style", &[]);
        html.w.raw(&css.stylesheet);
        html.w.end();
    }
    html.w.end();

    html.w.start("body", &[]);
    for tree in doc.page_trees() {
        for page in doc.tree_pages(tree) {
            html.page(page)?;
        }
    }
    html.w.end();
    html.w.end();
    Ok(html.w.finish())
}

/// Render one object as an HTML fragment.
///
/// Pages, blocks, canvases and text objects render as they would inside
/// [`to_html`]. Other kinds produce an empty fragment.
pub fn object_to_html(doc: &Document, object: &LrfObject, config: &ExportConfig) -> Result<String> {
    let css = generate_css(doc, &config.font_map);
    let mut html = HtmlWriter::new(doc, config, &css);
    match object.kind {
        ObjectKind::Page => html.page(object)?,
        ObjectKind::Text | ObjectKind::SimpleText => {
            html.text_block(&[attr("class", "text")], object)?
        }
        _ => html.object(object)?,
    }
    Ok(html.w.finish())
}

struct HtmlWriter<'a> {
    doc: &'a Document,
    fonts: &'a FontFaceMap,
    css: &'a CssArtifact,
    w: XmlWriter,
}

impl<'a> HtmlWriter<'a> {
    fn new(doc: &'a Document, config: &'a ExportConfig, css: &'a CssArtifact) -> Self {
        Self {
            doc,
            fonts: &config.font_map,
            css,
            w: XmlWriter::new(config.pretty),
        }
    }

    fn page(&mut self, page: &LrfObject) -> Result<()> {
        page.check()?;
        let doc = self.doc;
        self.w.start(
            "div",
            &[attr("class", "page"), attr("id", format!("page{}", page.id))],
        );
        for item in page.page().map(|p| p.content.as_slice()).unwrap_or_default() {
            match item {
                PageItem::Object(target) => self.object(doc.table().object(*target))?,
                PageItem::RuledLine { .. } | PageItem::PageDiv { .. } => self.w.empty("hr", &[]),
                _ => {}
            }
        }
        self.w.end();
        Ok(())
    }

    fn object(&mut self, object: &LrfObject) -> Result<()> {
        object.check()?;
        match object.kind {
            ObjectKind::Block => self.block(object),
            ObjectKind::Canvas | ObjectKind::Header | ObjectKind::Footer => {
                let doc = self.doc;
                let class = object.kind.name().to_ascii_lowercase();
                self.w.start("div", &[attr("class", class)]);
                for put in object.canvas().unwrap_or_default() {
                    self.object(doc.table().object(put.target))?;
                }
                self.w.end();
                Ok(())
            }
            kind => {
                debug!("{kind} {} has no HTML rendering", object.id);
                Ok(())
            }
        }
    }

    fn block(&mut self, block: &LrfObject) -> Result<()> {
        let doc = self.doc;
        let Some(content) = block.block() else {
            return Ok(());
        };
        let inner = doc.table().object(content.content);

        let mut classes: Vec<&str> = Vec::new();
        classes.extend(block.style_id.and_then(|id| self.css.class_name(id)));
        classes.extend(content.text_style.and_then(|id| self.css.class_name(id)));

        match content.kind {
            BlockKind::TextBlock | BlockKind::SimpleTextBlock => {
                let mut attrs = Attrs::new();
                if !classes.is_empty() {
                    attrs.push(attr("class", classes.join(" ")));
                }
                let mut style = BlockCss(&block.attrs).to_css_string();
                TextCss {
                    attrs: &inner.attrs,
                    fonts: self.fonts,
                }
                .to_css(&mut style);
                if !style.is_empty() {
                    attrs.push(attr("style", style.trim_end()));
                }
                self.text_block(&attrs, inner)
            }
            BlockKind::ImageBlock => {
                let Some(stream) = content
                    .image
                    .and_then(|image| image.refstream)
                    .and_then(|id| doc.get(id))
                else {
                    return Ok(());
                };
                stream.check()?;
                let mut attrs = vec![attr("src", stream.file_name().unwrap_or_default())];
                if let Some(image) = &content.image {
                    attrs.push(attr("width", image.xsize));
                    attrs.push(attr("height", image.ysize));
                }
                self.w.empty("img", &attrs);
                Ok(())
            }
            BlockKind::ButtonBlock => {
                debug!("button block {} has no HTML rendering", block.id);
                Ok(())
            }
        }
    }

    fn text_block(&mut self, attrs: &[(&'static str, String)], text: &LrfObject) -> Result<()> {
        let nodes = printable_text(text)?;
        self.w.start("div", attrs);
        write_nodes(&mut self.w, nodes, self.fonts);
        self.w.end();
        Ok(())
    }
}

/// HTML element and attributes for an LRF text container.
fn element(tag: &TextTag, fonts: &FontFaceMap) -> (&'static str, Attrs) {
    match tag.name {
        "P" => ("p", Attrs::new()),
        "Italic" => ("i", Attrs::new()),
        "Sup" => ("sup", Attrs::new()),
        "Sub" => ("sub", Attrs::new()),
        "Span" => {
            let style = TextCss {
                attrs: &tag.attrs,
                fonts,
            }
            .to_css_string();
            if style.is_empty() {
                ("span", Attrs::new())
            } else {
                ("span", vec![attr("style", style.trim_end())])
            }
        }
        _ => ("span", Attrs::new()),
    }
}

/// Write interpreted text as HTML inside an open block element.
fn write_nodes(w: &mut XmlWriter, nodes: &[Node], fonts: &FontFaceMap) {
    // One entry per open LRF container: whether it became an element.
    let mut open: Vec<bool> = Vec::new();
    let mut paragraphs = 0usize;

    for node in nodes {
        match node {
            Node::Text(text) => {
                if open.is_empty() {
                    w.inline("span", &[]);
                    w.text(text);
                    w.end();
                } else {
                    w.text(text);
                }
            }
            Node::Open(tag) if tag.self_closing => {
                if tag.name == "CR" {
                    if paragraphs > 0 {
                        w.empty("br", &[]);
                    } else {
                        w.inline("p", &[]);
                        w.end();
                    }
                }
            }
            Node::Open(tag) => {
                let (name, attrs) = element(tag, fonts);
                if tag.name == "P" {
                    paragraphs += 1;
                }
                w.inline(name, &attrs);
                open.push(tag.name == "P");
            }
            Node::Close => {
                if let Some(was_paragraph) = open.pop() {
                    if was_paragraph {
                        paragraphs -= 1;
                    }
                    w.end();
                }
            }
        }
    }
    for _ in open {
        w.end();
    }
}
