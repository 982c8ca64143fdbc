//! Text streams.
//!
//! The stream of a Text or SimpleText object is a byte program: UTF-16LE
//! runs interleaved with tags that open and close containers, change the
//! current text style, or insert inline objects. [`interpret`] flattens it
//! into a linear list of [`Node`]s whose opens and closes are balanced.

mod entities;
mod interp;

pub use entities::{resolve_entities, resolve_entity};
pub use interp::{interpret, is_text_tag};

use crate::schema::{AttrValue, Attributes};

/// Name of the implicit container created for inline style changes.
pub const SPAN: &str = "Span";
/// Name of the paragraph container.
pub const PARAGRAPH: &str = "P";

/// An inline element: a container or a self-closing mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTag {
    pub name: &'static str,
    pub attrs: Attributes,
    pub self_closing: bool,
}

impl TextTag {
    pub fn container(name: &'static str) -> Self {
        Self {
            name,
            attrs: Attributes::new(),
            self_closing: false,
        }
    }

    pub fn empty(name: &'static str) -> Self {
        Self {
            self_closing: true,
            ..Self::container(name)
        }
    }

    pub fn with_attr(mut self, name: &'static str, value: AttrValue) -> Self {
        self.attrs.insert(name, value);
        self
    }

    pub fn is_span(&self) -> bool {
        self.name == SPAN
    }

    /// Object referenced by a plot or character button.
    pub fn refobj(&self) -> Option<u32> {
        self.attrs
            .get("refobj")
            .and_then(AttrValue::as_int)
            .map(|id| id as u32)
    }
}

/// One element of an interpreted text stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Open(TextTag),
    /// Closes the most recent unclosed container.
    Close,
}

/// Residual open containers after replaying `nodes`.
///
/// A well-formed stream has none.
pub fn unclosed_containers(nodes: &[Node]) -> Vec<&'static str> {
    let mut stack = Vec::new();
    for node in nodes {
        match node {
            Node::Open(tag) if !tag.self_closing => stack.push(tag.name),
            Node::Close => {
                stack.pop();
            }
            _ => {}
        }
    }
    stack
}

/// Concatenated character data, ignoring markup.
pub fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Open(tag) if tag.name == "CR" => out.push('\n'),
            Node::Close => {}
            Node::Open(_) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclosed_containers() {
        let nodes = vec![
            Node::Open(TextTag::container(PARAGRAPH)),
            Node::Open(TextTag::container("Italic")),
            Node::Open(TextTag::empty("CR")),
            Node::Close,
        ];
        assert_eq!(unclosed_containers(&nodes), vec![PARAGRAPH]);
    }

    #[test]
    fn test_plain_text() {
        let nodes = vec![
            Node::Text("a".into()),
            Node::Open(TextTag::empty("CR")),
            Node::Text("b".into()),
        ];
        assert_eq!(plain_text(&nodes), "a\nb");
    }
}
