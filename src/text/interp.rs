use log::debug;
use memchr::memchr;

use super::{Node, PARAGRAPH, SPAN, TextTag, resolve_entities};
use crate::error::{ParseErrorKind, ParseResult};
use crate::io::ByteReader;
use crate::schema::{
    AttrValue, Attributes, Handler, LINE_TYPES, PLOT_ADJUSTMENTS, RUBY, Rule, TEXT_ATTR,
    TagSpec, empdots_attrs, find_rule, lookup,
};
use crate::tag::{RAW_TEXT, TAG_MARKER, Tag, unpack};
use crate::util::decode_utf16le;

/// Tables whose attribute tags change the current text style mid-stream.
const STYLE_TABLES: &[&[TagSpec]] = &[TEXT_ATTR, RUBY];

const EMPLINE_POSITION: u16 = 0xF579;
const EMPLINE_TYPE: u16 = 0xF57A;

#[derive(Debug, Clone, Copy)]
enum Op {
    Open(&'static str),
    /// Closes the innermost container with this name.
    Close(&'static str),
    Paragraph,
    EndParagraph,
    CharButton,
    EmpLine,
    DrawChar,
    Box,
    Space,
    Plot,
    Mark(&'static str),
}

fn op(id: u16) -> Option<Op> {
    Some(match id {
        0xF581 => Op::Open("Italic"),
        0xF5A1 => Op::Paragraph,
        0xF5A2 => Op::EndParagraph,
        0xF5A7 => Op::CharButton,
        0xF5A9 => Op::Open("Rubi"),
        0xF5AB => Op::Open("Oyamoji"),
        0xF5AD => Op::Open("Rubimoji"),
        0xF5B1 => Op::Open("Yoko"),
        0xF5B3 => Op::Open("Tate"),
        0xF5B5 => Op::Open("Nekase"),
        0xF5B7 => Op::Open("Sup"),
        0xF5B9 => Op::Open("Sub"),
        0xF5BB => Op::Open("NoBR"),
        0xF5BD => Op::Open("EmpDots"),
        0xF5C1 => Op::EmpLine,
        0xF5C3 => Op::DrawChar,
        0xF5C6 => Op::Box,
        0xF5CA => Op::Space,
        0xF5D1 => Op::Plot,
        0xF5D2 => Op::Mark("CR"),
        0xF5D6 => Op::Mark("SoundStop"),
        0xF582 => Op::Close("Italic"),
        0xF5A8 => Op::Close("CharButton"),
        0xF5AA => Op::Close("Rubi"),
        0xF5AC => Op::Close("Oyamoji"),
        0xF5AE => Op::Close("Rubimoji"),
        0xF5B2 => Op::Close("Yoko"),
        0xF5B4 => Op::Close("Tate"),
        0xF5B6 => Op::Close("Nekase"),
        0xF5B8 => Op::Close("Sup"),
        0xF5BA => Op::Close("Sub"),
        0xF5BC => Op::Close("NoBR"),
        0xF5BE => Op::Close("EmpDots"),
        0xF5C2 => Op::Close("EmpLine"),
        0xF5C4 => Op::Close("DrawChar"),
        0xF5C7 => Op::Close("Box"),
        _ => return None,
    })
}

/// Whether `id` can start a tag inside a text stream.
///
/// Object-level tags (`F500`..=`F509`) never appear in text, which rules
/// out most false positives from UTF-16 code units ending in `0xF5`.
pub fn is_text_tag(id: u16) -> bool {
    if (0xF500..=0xF509).contains(&id) {
        return false;
    }
    id == RAW_TEXT || op(id).is_some() || find_rule(STYLE_TABLES, id).is_some()
}

/// Offset of the next decodable text tag at or after `from`.
fn next_tag(data: &[u8], from: usize) -> Option<usize> {
    // The marker is the second byte of a tag id.
    let mut search = from + 1;
    while search < data.len() {
        let marker = search + memchr(TAG_MARKER, &data[search..])?;
        let candidate = marker - 1;
        let mut probe = ByteReader::new(data);
        if probe.seek(candidate).is_ok()
            && let Ok(tag) = Tag::read(&mut probe)
            && is_text_tag(tag.id)
        {
            return Some(candidate);
        }
        search = marker + 1;
    }
    None
}

struct Frame {
    name: &'static str,
    /// False for containers whose markup was dropped; closing them emits nothing.
    emitted: bool,
    /// Style values to restore when this frame closes.
    saved: Vec<(&'static str, Option<AttrValue>)>,
}

impl Frame {
    fn new(name: &'static str, emitted: bool) -> Self {
        Self {
            name,
            emitted,
            saved: Vec::new(),
        }
    }
}

struct Interpreter<'a> {
    reader: ByteReader<'a>,
    style: Attributes,
    nodes: Vec<Node>,
    stack: Vec<Frame>,
}

/// Interpret a decoded text stream against the object's effective style.
///
/// Style tags whose value differs from the current style open (or extend)
/// a `Span`; unclosed containers are closed at the end of the stream.
/// Unbalanced closes and undecodable tags are reported as malformed text.
pub fn interpret(stream: &[u8], style: &Attributes) -> ParseResult<Vec<Node>> {
    let mut interpreter = Interpreter {
        reader: ByteReader::new(stream),
        style: style.clone(),
        nodes: Vec::new(),
        stack: Vec::new(),
    };
    interpreter.run().map_err(|mut err| {
        if !matches!(err.kind, ParseErrorKind::MalformedText(_)) {
            err.kind = ParseErrorKind::MalformedText(err.kind.to_string());
        }
        err
    })?;
    Ok(interpreter.finish())
}

impl Interpreter<'_> {
    fn run(&mut self) -> ParseResult<()> {
        let data = self.reader.data();
        while !self.reader.at_end() {
            let start = self.reader.tell();
            let next = next_tag(data, start);
            let end = next.unwrap_or(data.len());
            if end > start {
                self.push_text(&data[start..end]);
            }
            if next.is_none() {
                break;
            }
            self.reader.seek(end)?;
            let tag = Tag::read(&mut self.reader)?;
            self.dispatch(&tag)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.stack.is_empty() {
            self.pop_frame();
        }
        self.nodes
    }

    fn dispatch(&mut self, tag: &Tag<'_>) -> ParseResult<()> {
        if tag.id == RAW_TEXT {
            let len = tag.word()? as usize;
            let bytes = self.reader.read_bytes(len)?;
            self.push_text(bytes);
            return Ok(());
        }
        if let Some(op) = op(tag.id) {
            return self.apply(op, tag);
        }
        match find_rule(STYLE_TABLES, tag.id) {
            Some(Rule::Attr(name, decode)) => {
                let value = decode.apply(name, tag)?;
                self.set_style(name, value);
            }
            Some(Rule::Handle(Handler::EmpDots)) => {
                for (name, value) in empdots_attrs(tag) {
                    self.set_style(name, value);
                }
            }
            _ => debug!("tag {:#06X} has no inline meaning", tag.id),
        }
        Ok(())
    }

    fn apply(&mut self, op: Op, tag: &Tag<'_>) -> ParseResult<()> {
        match op {
            Op::Open(name) => self.open(TextTag::container(name)),
            Op::Close(name) => self.close(name, tag)?,
            Op::Paragraph => self.open(TextTag::container(PARAGRAPH)),
            Op::EndParagraph => self.end_paragraph(tag)?,
            Op::CharButton => {
                let id = tag.dword()?;
                self.open(TextTag::container("CharButton").with_attr("refobj", AttrValue::Int(id.into())));
            }
            Op::EmpLine => self.empline()?,
            Op::DrawChar => {
                let line = tag.word()?;
                self.open(TextTag::container("DrawChar").with_attr("line", AttrValue::Int(line.into())));
            }
            Op::Box => {
                let raw = tag.word()?;
                let linetype = lookup(LINE_TYPES, raw).ok_or_else(|| {
                    tag.error(ParseErrorKind::BadValue {
                        attr: "linetype",
                        value: raw.into(),
                    })
                })?;
                self.open(TextTag::container("Box").with_attr("linetype", AttrValue::Name(linetype)));
            }
            Op::Space => {
                let xsize = tag.sword()?;
                self.open(TextTag::empty("Space").with_attr("xsize", AttrValue::Int(xsize.into())));
            }
            Op::Plot => {
                let v = unpack(tag.fixed(12)?, "HHII");
                let adjustment = u16::try_from(v[3])
                    .ok()
                    .and_then(|code| lookup(PLOT_ADJUSTMENTS, code))
                    .ok_or_else(|| {
                        tag.error(ParseErrorKind::BadValue {
                            attr: "adjustment",
                            value: v[3],
                        })
                    })?;
                self.open(
                    TextTag::empty("Plot")
                        .with_attr("xsize", AttrValue::Int(v[0].into()))
                        .with_attr("ysize", AttrValue::Int(v[1].into()))
                        .with_attr("refobj", AttrValue::Int(v[2].into()))
                        .with_attr("adjustment", AttrValue::Name(adjustment)),
                );
            }
            Op::Mark(name) => self.open(TextTag::empty(name)),
        }
        Ok(())
    }

    fn push_text(&mut self, bytes: &[u8]) {
        let text = decode_utf16le(bytes);
        if !text.is_empty() {
            self.nodes.push(Node::Text(resolve_entities(&text).into_owned()));
        }
    }

    fn open(&mut self, tag: TextTag) {
        if !tag.self_closing {
            self.stack.push(Frame::new(tag.name, true));
        }
        self.nodes.push(Node::Open(tag));
    }

    fn set_style(&mut self, name: &'static str, value: AttrValue) {
        let previous = self.style.get(name).cloned();
        if previous.as_ref() == Some(&value) {
            return;
        }

        let extend = matches!(self.nodes.last(), Some(Node::Open(tag)) if tag.is_span());
        if extend {
            if let Some(Node::Open(span)) = self.nodes.last_mut() {
                span.attrs.insert(name, value.clone());
            }
        } else {
            self.open(TextTag::container(SPAN).with_attr(name, value.clone()));
        }

        // The span just opened or extended is the top frame.
        if let Some(frame) = self.stack.last_mut()
            && !frame.saved.iter().any(|(saved, _)| *saved == name)
        {
            frame.saved.push((name, previous));
        }
        self.style.insert(name, value);
    }

    fn pop_frame(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        for (name, value) in frame.saved.into_iter().rev() {
            if let Some(value) = value {
                self.style.insert(name, value);
            } else {
                self.style.shift_remove(name);
            }
        }
        if !frame.emitted {
            return;
        }
        let empty_span =
            frame.name == SPAN && matches!(self.nodes.last(), Some(Node::Open(tag)) if tag.is_span());
        if empty_span {
            self.nodes.pop();
        } else {
            self.nodes.push(Node::Close);
        }
    }

    /// Close the innermost `name` container and everything opened inside it.
    ///
    /// Spans and dropped containers above it close silently.
    fn close(&mut self, name: &'static str, tag: &Tag<'_>) -> ParseResult<()> {
        if !self.stack.iter().any(|frame| frame.name == name) {
            return Err(tag.error(ParseErrorKind::MalformedText(format!(
                "close tag without an open {name}"
            ))));
        }
        while let Some(frame) = self.stack.last() {
            let target = frame.name == name;
            self.pop_frame();
            if target {
                break;
            }
        }
        Ok(())
    }

    /// Close everything up to and including the innermost paragraph.
    fn end_paragraph(&mut self, tag: &Tag<'_>) -> ParseResult<()> {
        if !self.stack.iter().any(|frame| frame.name == PARAGRAPH) {
            return Err(tag.error(ParseErrorKind::MalformedText(
                "paragraph end without an open paragraph".into(),
            )));
        }
        while let Some(frame) = self.stack.last() {
            let paragraph = frame.name == PARAGRAPH;
            self.pop_frame();
            if paragraph {
                break;
            }
        }
        Ok(())
    }

    /// Open an emphasis line, reading up to two attribute tags after it.
    ///
    /// Without either attribute the container is dropped; a silent frame
    /// absorbs its close tag.
    fn empline(&mut self) -> ParseResult<()> {
        let mut empline = TextTag::container("EmpLine");
        for _ in 0..2 {
            let save = self.reader.tell();
            let attr = Tag::read(&mut self.reader)
                .ok()
                .filter(|tag| tag.id == EMPLINE_POSITION || tag.id == EMPLINE_TYPE)
                .and_then(|tag| match find_rule(STYLE_TABLES, tag.id) {
                    Some(Rule::Attr(name, decode)) => Some((name, decode.apply(name, &tag).ok()?)),
                    _ => None,
                });
            match attr {
                Some((name, value)) => {
                    empline.attrs.insert(name, value);
                }
                None => {
                    self.reader.seek(save)?;
                    break;
                }
            }
        }

        if empline.attrs.is_empty() {
            debug!(
                "empline at {:#x} has no position or type, markup dropped",
                self.reader.absolute()
            );
            self.stack.push(Frame::new("EmpLine", false));
        } else {
            self.open(empline);
        }
        Ok(())
    }
}
