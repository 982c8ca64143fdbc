//! Declarative tag tables.
//!
//! Each object kind is described by a list of [`TagSpec`] tables. A tag
//! either becomes a named attribute through a [`Decode`] rule, is handed to
//! a structural [`Handler`], or is ignored. Tag ids absent from an object's
//! tables are an error, which keeps the loader honest about what it
//! understands.

mod tables;
mod value;

pub use tables::*;
pub use value::{AttrValue, Attributes, int_attr};

use crate::error::{ParseErrorKind, ParseResult};
use crate::object::ButtonState;
use crate::style::Color;
use crate::tag::{Payload, Tag};

/// Raw code to symbolic name.
pub type ValueMap = [(u16, &'static str)];

pub fn lookup(map: &ValueMap, raw: u16) -> Option<&'static str> {
    map.iter().find(|(code, _)| *code == raw).map(|(_, name)| *name)
}

/// How an attribute tag's payload becomes an [`AttrValue`].
#[derive(Debug, Clone, Copy)]
pub enum Decode {
    Byte,
    Word,
    SWord,
    DWord,
    String,
    Color,
    /// A word looked up in a value map; a miss is an error.
    Map(&'static ValueMap),
}

impl Decode {
    pub fn apply(self, name: &'static str, tag: &Tag<'_>) -> ParseResult<AttrValue> {
        Ok(match self {
            Decode::Byte => AttrValue::Int(tag.byte()?.into()),
            Decode::Word => AttrValue::Int(tag.word()?.into()),
            Decode::SWord => AttrValue::Int(tag.sword()?.into()),
            Decode::DWord => AttrValue::Int(tag.dword()?.into()),
            Decode::String => AttrValue::Text(tag.string()?.to_owned()),
            Decode::Color => AttrValue::Color(Color::from_dword(tag.dword()?)),
            Decode::Map(map) => {
                let raw = tag.word()?;
                let value = lookup(map, raw).ok_or_else(|| {
                    tag.error(ParseErrorKind::BadValue {
                        attr: name,
                        value: raw.into(),
                    })
                })?;
                AttrValue::Name(value)
            }
        })
    }
}

/// The three attributes an `F578` empdots tag carries.
pub fn empdots_attrs(tag: &Tag<'_>) -> Vec<(&'static str, AttrValue)> {
    let Payload::EmpDots {
        font_ref,
        face_name,
        code,
    } = &tag.payload
    else {
        return Vec::new();
    };
    vec![
        ("refempdotsfont", AttrValue::Int((*font_ref).into())),
        ("empdotsfontname", AttrValue::Text(face_name.clone())),
        ("empdotscode", AttrValue::Text(format!("0x{code:04x}"))),
    ]
}

/// Structural tags that need more than a name and a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    InfoLink,
    StyleId,
    StreamSize,
    StreamFlags,
    StreamBody,
    StreamEnd,
    BgImage,
    EmpDots,
    ObjectList,
    ParentPageTree,
    PageList,
    PageTreeId,
    FontLink,
    ImageRect,
    ImageSize,
    RefStream,
    CanvasWaits,
    ButtonRefImage,
    ButtonFlags,
    ButtonStateStart(ButtonState),
    ButtonStateEnd,
    ActionsStart,
    ActionsEnd,
    JumpTo,
    SendMessage,
    CloseWindow,
    SoundStop,
    Run,
}

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Attr(&'static str, Decode),
    Handle(Handler),
    Ignore,
}

#[derive(Debug, Clone, Copy)]
pub struct TagSpec {
    pub id: u16,
    pub rule: Rule,
}

impl TagSpec {
    pub const fn attr(id: u16, name: &'static str, decode: Decode) -> Self {
        Self {
            id,
            rule: Rule::Attr(name, decode),
        }
    }

    pub const fn handle(id: u16, handler: Handler) -> Self {
        Self {
            id,
            rule: Rule::Handle(handler),
        }
    }

    pub const fn ignore(id: u16) -> Self {
        Self {
            id,
            rule: Rule::Ignore,
        }
    }
}

/// First rule for `id` across `tables`, searched in order.
pub fn find_rule(tables: &[&[TagSpec]], id: u16) -> Option<Rule> {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .find(|spec| spec.id == id)
        .map(|spec| spec.rule)
}

/// Name of the attribute a tag id decodes to, if it is a plain attribute.
pub fn attr_name(tables: &[&[TagSpec]], id: u16) -> Option<&'static str> {
    match find_rule(tables, id)? {
        Rule::Attr(name, _) => Some(name),
        _ => None,
    }
}
