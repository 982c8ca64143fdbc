//! Folding block and text attributes into CSS declarations.
//!
//! Only attributes that are present produce declarations, so a style
//! object with no visual attributes folds to an empty string.

use std::fmt::Write;

use super::{FontFaceMap, ToCss};
use crate::schema::{AttrValue, Attributes};

/// Emit `name: <int><unit>; ` when the attribute is an integer.
macro_rules! emit_int {
    ($attrs:expr, $buf:expr, $key:expr, $($css:expr),+ ; $unit:expr) => {
        if let Some(v) = $attrs.get($key).and_then(AttrValue::as_int) {
            $(
                let _ = write!($buf, "{}: {}{}; ", $css, v, $unit);
            )+
        }
    };
}

/// Emit a colour declaration only for visible colours.
macro_rules! emit_color {
    ($attrs:expr, $buf:expr, $key:expr, $css:expr) => {
        if let Some(color) = $attrs.get($key).and_then(AttrValue::as_color)
            && color.is_visible()
        {
            $buf.push_str($css);
            $buf.push_str(": ");
            color.to_css($buf);
            $buf.push_str("; ");
        }
    };
}

/// Format a tenth-of-a-point quantity as points, e.g. `100` → `"10"`, `95` → `"9.5"`.
pub fn tenths_to_pt(value: i64) -> String {
    if value % 10 == 0 {
        (value / 10).to_string()
    } else {
        format!("{:.1}", value as f64 / 10.0)
    }
}

/// CSS for a BlockAttr (or a block's own overrides).
pub struct BlockCss<'a>(pub &'a Attributes);

impl ToCss for BlockCss<'_> {
    fn to_css(&self, buf: &mut String) {
        let attrs = self.0;
        emit_int!(attrs, buf, "sidemargin", "margin-left", "margin-right"; "px");
        emit_int!(attrs, buf, "topskip", "margin-top"; "px");
        emit_int!(attrs, buf, "footskip", "margin-bottom"; "px");
        if let Some(width) = attrs.get("framewidth").and_then(AttrValue::as_int) {
            let _ = write!(buf, "border: solid {width}px; ");
        }
        emit_color!(attrs, buf, "framecolor", "border-color");
        emit_color!(attrs, buf, "bgcolor", "background-color");
    }
}

/// CSS for a TextAttr, a text object's overrides, or an inline span.
pub struct TextCss<'a> {
    pub attrs: &'a Attributes,
    pub fonts: &'a FontFaceMap,
}

impl ToCss for TextCss<'_> {
    fn to_css(&self, buf: &mut String) {
        let attrs = self.attrs;
        if let Some(size) = attrs.get("fontsize").and_then(AttrValue::as_int) {
            let _ = write!(buf, "font-size: {}pt; ", tenths_to_pt(size));
        }
        if let Some(weight) = attrs.get("fontweight").and_then(AttrValue::as_int) {
            let weight = if weight >= 700 { "bold" } else { "normal" };
            let _ = write!(buf, "font-weight: {weight}; ");
        }
        if let Some(face) = attrs.get("fontfacename").and_then(AttrValue::as_text) {
            let _ = write!(buf, "font-family: {}; ", self.fonts.family(face));
        }
        emit_color!(attrs, buf, "textcolor", "color");
        emit_color!(attrs, buf, "textbgcolor", "background-color");
        if let Some(align) = attrs.get("align").and_then(AttrValue::as_name) {
            let align = match align {
                "center" => "center",
                "foot" => "right",
                _ => "left",
            };
            let _ = write!(buf, "text-align: {align}; ");
        }
        if let Some(space) = attrs.get("linespace").and_then(AttrValue::as_int) {
            let _ = write!(buf, "line-height: {}pt; ", tenths_to_pt(space));
        }
        if let Some(indent) = attrs.get("parindent").and_then(AttrValue::as_int) {
            let _ = write!(buf, "text-indent: {}pt; ", tenths_to_pt(indent));
        }
    }
}
