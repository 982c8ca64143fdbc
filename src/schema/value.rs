use std::fmt;

use indexmap::IndexMap;

use crate::style::Color;

/// Decoded value of an attribute tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Int(i64),
    /// Symbolic name from a value map, e.g. `"center"` for alignment 4.
    Name(&'static str),
    Color(Color),
    Text(String),
}

impl AttrValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&'static str> {
        match self {
            AttrValue::Name(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            AttrValue::Color(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Name(v) => f.write_str(v),
            AttrValue::Color(v) => write!(f, "{v}"),
            AttrValue::Text(v) => f.write_str(v),
        }
    }
}

/// Attribute set in declaration order, keyed by the LRS attribute name.
pub type Attributes = IndexMap<&'static str, AttrValue>;

/// Integer attribute lookup that tolerates missing keys.
pub fn int_attr(attrs: &Attributes, name: &str) -> Option<i64> {
    attrs.get(name).and_then(AttrValue::as_int)
}
