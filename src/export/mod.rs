//! Serializers for a parsed [`Document`].
//!
//! Two outputs are supported:
//! - LRS-XML, the XML form of the full object graph ([`to_lrs`])
//! - HTML with a generated stylesheet, covering the text blocks of each
//!   page ([`to_html`])
//!
//! Serializers are read-only passes over the document and take their
//! settings from an explicit [`ExportConfig`].
//!
//! # Example
//!
//! ```no_run
//! use lrf::Document;
//! use lrf::export::{ExportConfig, to_lrs};
//!
//! let doc = Document::open("book.lrf")?;
//! let xml = to_lrs(&doc, &ExportConfig::default())?;
//! println!("{xml}");
//! # Ok::<(), lrf::Error>(())
//! ```

mod css_gen;
mod html;
mod lrs;
mod xml;

pub use css_gen::{CssArtifact, generate_css};
pub use html::{object_to_html, to_html};
pub use lrs::{object_to_lrs, to_lrs};

use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::object::LrfObject;
use crate::style::FontFaceMap;
use crate::text::{Node, unclosed_containers};

/// Serializer settings.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Indent nested elements.
    pub pretty: bool,
    /// Font face name to CSS family.
    pub font_map: FontFaceMap,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            font_map: FontFaceMap::default(),
        }
    }
}

/// Text nodes of `object`, or the error that makes it unprintable.
fn printable_text(object: &LrfObject) -> ParseResult<&[Node]> {
    let nodes = object.text_nodes().map_err(|e| e.in_object(object.id))?;
    let open = unclosed_containers(nodes);
    if open.len() > 1 {
        return Err(ParseError::new(ParseErrorKind::MalformedText(format!(
            "{} containers left open: {}",
            open.len(),
            open.join(", ")
        )))
        .in_object(object.id));
    }
    Ok(nodes)
}
