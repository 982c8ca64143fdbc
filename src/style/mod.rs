//! Presentation: colours, font faces, and CSS folding of LRF attributes.

mod color;
mod css;
mod fonts;

/// Types that can be written as CSS.
pub trait ToCss {
    /// Write this value as CSS to the buffer.
    fn to_css(&self, buf: &mut String);

    /// Convert to a CSS string (convenience method).
    fn to_css_string(&self) -> String {
        let mut buf = String::new();
        self.to_css(&mut buf);
        buf
    }
}

pub use color::Color;
pub use css::{BlockCss, TextCss, tenths_to_pt};
pub use fonts::FontFaceMap;
