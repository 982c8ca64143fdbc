//! Phase three: turning decoded streams into content.
//!
//! Runs once every object is loaded and every declared reference is bound,
//! so links found inside streams can be resolved against the full table.

mod block;
mod canvas;
mod page;
mod toc;

pub use block::{BlockContent, BlockKind};
pub use canvas::PutObj;
pub use page::PageItem;
pub use toc::TocEntry;

use crate::document::ObjectTable;
use crate::error::ParseResult;
use crate::object::{LrfObject, ObjectBody, ObjectKind};
use crate::schema::Attributes;
use crate::text::{self, Node};

/// Whether objects of `kind` build their body from their stream.
pub fn has_content(kind: ObjectKind) -> bool {
    matches!(
        kind,
        ObjectKind::Page
            | ObjectKind::Block
            | ObjectKind::Text
            | ObjectKind::SimpleText
            | ObjectKind::Canvas
            | ObjectKind::Header
            | ObjectKind::Footer
            | ObjectKind::Toc
    )
}

/// Build the body of `object` from its decoded stream.
///
/// Returns `None` for kinds without stream content.
pub(crate) fn initialize(
    table: &ObjectTable,
    object: &LrfObject,
    stream: &[u8],
) -> ParseResult<Option<ObjectBody>> {
    let body = match (&object.kind, &object.body) {
        (ObjectKind::Page, ObjectBody::Page(page)) => {
            let mut page = page.clone();
            page.content = page::assemble(table, stream)?;
            ObjectBody::Page(page)
        }
        (ObjectKind::Block, _) if stream.is_empty() => ObjectBody::Block(None),
        (ObjectKind::Block, _) => ObjectBody::Block(Some(block::resolve(table, stream)?)),
        (ObjectKind::Text | ObjectKind::SimpleText, _) => {
            let nodes = text::interpret(stream, &text_style(table, object))?;
            check_inline_refs(table, &nodes)?;
            ObjectBody::Text(nodes)
        }
        (ObjectKind::Canvas | ObjectKind::Header | ObjectKind::Footer, _) => {
            ObjectBody::Canvas(canvas::assemble(table, stream)?)
        }
        (ObjectKind::Toc, _) => ObjectBody::Toc(toc::assemble(table, stream)?),
        _ => return Ok(None),
    };
    Ok(Some(body))
}

/// Starting style of a text object: its TextAttr overlaid with its own attributes.
fn text_style(table: &ObjectTable, object: &LrfObject) -> Attributes {
    let mut style = object
        .style_id
        .and_then(|id| table.get(id))
        .map(|attr| attr.attrs.clone())
        .unwrap_or_default();
    for (name, value) in &object.attrs {
        style.insert(name, value.clone());
    }
    style
}

/// Plots and character buttons must point at existing objects.
fn check_inline_refs(table: &ObjectTable, nodes: &[Node]) -> ParseResult<()> {
    for node in nodes {
        if let Node::Open(tag) = node
            && let Some(id) = tag.refobj()
        {
            table.resolve(id, &[], "any object")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCategory, ParseErrorKind};
    use crate::schema::AttrValue;

    #[test]
    fn test_text_inherits_style_object() {
        let mut attr = LrfObject::new(30, ObjectKind::TextAttr, 0, 0);
        attr.attrs.insert("fontsize", AttrValue::Int(100));
        attr.attrs.insert("fontweight", AttrValue::Int(400));
        let mut text = LrfObject::new(50, ObjectKind::Text, 0, 0);
        text.style_id = Some(30);
        text.attrs.insert("fontweight", AttrValue::Int(700));
        let table = ObjectTable::from_objects(vec![attr, text]).unwrap();

        let style = text_style(&table, table.get(50).unwrap());
        assert_eq!(style.get("fontsize"), Some(&AttrValue::Int(100)));
        assert_eq!(style.get("fontweight"), Some(&AttrValue::Int(700)));

        // Same weight as the effective style: no span.
        let body = initialize(&table, table.get(50).unwrap(), &[0x15, 0xF5, 0xBC, 0x02])
            .unwrap()
            .unwrap();
        assert_eq!(body, ObjectBody::Text(Vec::new()));
    }

    #[test]
    fn test_plot_to_missing_object() {
        let text = LrfObject::new(50, ObjectKind::Text, 0, 0);
        let table = ObjectTable::from_objects(vec![text]).unwrap();
        let stream = [0xD1, 0xF5, 10, 0, 20, 0, 99, 0, 0, 0, 1, 0, 0, 0];
        let err = initialize(&table, table.get(50).unwrap(), &stream).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DanglingReference(99));
    }

    #[test]
    fn test_malformed_text_is_content_error() {
        let text = LrfObject::new(50, ObjectKind::Text, 0, 0);
        let table = ObjectTable::from_objects(vec![text]).unwrap();
        let err = initialize(&table, table.get(50).unwrap(), &[0xA2, 0xF5]).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Content);
    }

    #[test]
    fn test_styles_have_no_content() {
        let attr = LrfObject::new(30, ObjectKind::TextAttr, 0, 0);
        let table = ObjectTable::from_objects(vec![attr]).unwrap();
        assert!(!has_content(ObjectKind::TextAttr));
        assert!(initialize(&table, table.get(30).unwrap(), &[]).unwrap().is_none());
    }
}
