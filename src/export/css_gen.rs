//! CSS generation from style objects.
//!
//! Every BlockAttr becomes a `.blockN` class and every TextAttr a `.textM`
//! class, `N`/`M` being the style object's id. Blocks reference their
//! styles by class instead of repeating declarations inline.
//!
//! # Example
//!
//! ```no_run
//! use lrf::Document;
//! use lrf::export::generate_css;
//! use lrf::style::FontFaceMap;
//!
//! let doc = Document::open("book.lrf")?;
//! let artifact = generate_css(&doc, &FontFaceMap::default());
//!
//! // artifact.stylesheet contains the CSS text
//! // artifact.class_map maps style object id -> class name (e.g., "block12")
//! # Ok::<(), lrf::Error>(())
//! ```

use std::collections::HashMap;
use std::fmt::Write;

use crate::document::Document;
use crate::object::ObjectKind;
use crate::style::{BlockCss, FontFaceMap, TextCss, ToCss};

/// Generated CSS artifact containing the stylesheet and class mapping.
#[derive(Debug, Clone, Default)]
pub struct CssArtifact {
    /// The generated CSS stylesheet text.
    pub stylesheet: String,
    /// Map from style object id to CSS class name.
    pub class_map: HashMap<u32, String>,
}

impl CssArtifact {
    /// Get the CSS class name for a style object, if one exists.
    pub fn class_name(&self, id: u32) -> Option<&str> {
        self.class_map.get(&id).map(|s| s.as_str())
    }

    /// Check if the stylesheet is empty (no style declares anything visual).
    pub fn is_empty(&self) -> bool {
        self.stylesheet.is_empty()
    }
}

/// Generate a stylesheet for every BlockAttr and TextAttr in `doc`.
///
/// Classes are assigned to all style objects so markup can reference them;
/// rules are only written for styles that fold to at least one declaration.
pub fn generate_css(doc: &Document, fonts: &FontFaceMap) -> CssArtifact {
    let mut artifact = CssArtifact::default();

    for object in doc.objects() {
        let (prefix, declarations) = match object.kind {
            ObjectKind::BlockAttr => ("block", BlockCss(&object.attrs).to_css_string()),
            ObjectKind::TextAttr => (
                "text",
                TextCss {
                    attrs: &object.attrs,
                    fonts,
                }
                .to_css_string(),
            ),
            _ => continue,
        };

        let class_name = format!("{prefix}{}", object.id);
        if !declarations.is_empty() {
            let _ = writeln!(artifact.stylesheet, ".{class_name} {{ {declarations}}}");
        }
        artifact.class_map.insert(object.id, class_name);
    }

    artifact
}
