//! Minimal indenting XML writer shared by the serializers.

use std::fmt::Display;
use std::fmt::Write;

use quick_xml::escape::escape;

/// Builds an XML document into a string.
///
/// In pretty mode every element starts on its own indented line, except
/// inside [`XmlWriter::inline`] runs where whitespace is significant.
pub(crate) struct XmlWriter {
    out: String,
    pretty: bool,
    stack: Vec<String>,
    inline_depth: Option<usize>,
}

/// Attribute list for an element.
pub(crate) type Attrs = Vec<(&'static str, String)>;

impl XmlWriter {
    pub fn new(pretty: bool) -> Self {
        Self {
            out: String::new(),
            pretty,
            stack: Vec::new(),
            inline_depth: None,
        }
    }

    pub fn declaration(&mut self) {
        self.out
            .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        if self.pretty {
            self.out.push('\n');
        }
    }

    fn indent(&mut self) {
        if self.pretty && self.inline_depth.is_none() {
            if !self.out.is_empty() && !self.out.ends_with('\n') {
                self.out.push('\n');
            }
            for _ in 0..self.stack.len() {
                self.out.push_str("  ");
            }
        }
    }

    fn write_tag(&mut self, name: &str, attrs: &[(&'static str, String)], empty: bool) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attrs {
            let _ = write!(self.out, " {key}=\"{}\"", escape(value.as_str()));
        }
        self.out.push_str(if empty { "/>" } else { ">" });
    }

    pub fn start(&mut self, name: &str, attrs: &[(&'static str, String)]) {
        self.write_tag(name, attrs, false);
        self.stack.push(name.to_owned());
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&'static str, String)]) {
        self.write_tag(name, attrs, true);
    }

    /// Close the innermost open element.
    pub fn end(&mut self) {
        let Some(name) = self.stack.pop() else {
            return;
        };
        if self.inline_depth == Some(self.stack.len()) {
            self.inline_depth = None;
            self.out.push_str("</");
        } else if self.inline_depth.is_none() && self.pretty && self.out.ends_with('>') {
            // Elements holding only other elements close on their own line.
            self.out.push('\n');
            for _ in 0..self.stack.len() {
                self.out.push_str("  ");
            }
            self.out.push_str("</");
        } else {
            self.out.push_str("</");
        }
        self.out.push_str(&name);
        self.out.push('>');
    }

    /// Open an element whose content is written without added whitespace.
    pub fn inline(&mut self, name: &str, attrs: &[(&'static str, String)]) {
        self.write_tag(name, attrs, false);
        if self.inline_depth.is_none() {
            self.inline_depth = Some(self.stack.len());
        }
        self.stack.push(name.to_owned());
    }

    pub fn text(&mut self, text: &str) {
        self.out.push_str(&escape(text));
    }

    /// `<name>text</name>` on one line.
    pub fn text_element(&mut self, name: &str, attrs: &[(&'static str, String)], text: &str) {
        self.inline(name, attrs);
        self.text(text);
        self.end();
    }

    /// Raw pre-formatted markup.
    pub fn raw(&mut self, markup: &str) {
        self.out.push_str(markup);
    }

    pub fn finish(mut self) -> String {
        while !self.stack.is_empty() {
            self.end();
        }
        if self.pretty && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out
    }
}

/// Attribute value from anything displayable.
pub(crate) fn attr(name: &'static str, value: impl Display) -> (&'static str, String) {
    (name, value.to_string())
}
