//! Error types for LRF reading and export.

use std::fmt;

use thiserror::Error;

/// Errors that can occur while reading or exporting an LRF book.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid LRF: {0}")]
    InvalidLrf(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Result of a decoding step that can be attributed to an object, tag and offset.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// How far a parse failure propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed binary structure. Aborts the document.
    Structural,
    /// Cross-reference to a missing object or an object of the wrong kind. Aborts the document.
    Reference,
    /// Unbalanced or undecodable text. Poisons only the object.
    Content,
    /// Undecodable embedded stream. Poisons only the object.
    Resource,
}

impl ErrorCategory {
    pub fn aborts_document(self) -> bool {
        matches!(self, ErrorCategory::Structural | ErrorCategory::Reference)
    }
}

/// What went wrong while decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected end of data: needed {needed} bytes, {available} available")]
    ShortRead { needed: usize, available: usize },

    #[error("seek to {0} is outside the buffer")]
    SeekOutOfBounds(usize),

    #[error("bad tag marker byte {0:#04x}")]
    BadTagMarker(u8),

    #[error("unknown tag id")]
    UnknownTag,

    #[error("tag is not valid in {0}")]
    UnexpectedTag(&'static str),

    #[error("tag payload is {actual} bytes, expected {expected}")]
    PayloadSize { expected: usize, actual: usize },

    #[error("malformed empdots tag")]
    BadEmpDots,

    #[error("object does not begin with an object start tag")]
    MissingObjectStart,

    #[error("object does not end with an object end tag")]
    MissingObjectEnd,

    #[error(
        "object header says id {found_id} type {found_type:#04x}, index says id {expected_id} type {expected_type:#04x}"
    )]
    HeaderMismatch {
        expected_id: u32,
        expected_type: u16,
        found_id: u32,
        found_type: u16,
    },

    #[error("unknown object type code {0:#04x}")]
    UnknownObjectType(u16),

    #[error("duplicate object id")]
    DuplicateObject,

    #[error("value {value:#x} is not valid for {attr}")]
    BadValue { attr: &'static str, value: u32 },

    #[error("stream data precedes the stream size tag")]
    MissingStreamSize,

    #[error("stream trailer is {0:02x?}, expected [06, f5]")]
    BadStreamTrailer([u8; 2]),

    #[error("decompressed stream is {actual} bytes, header declares {expected}")]
    DecompressedSize { expected: u32, actual: usize },

    #[error("header declares {expected} decompressed bytes, more than {limit} can inflate to")]
    DecompressedSizeLimit { expected: u32, limit: u64 },

    #[error("compressed stream is shorter than its size prefix")]
    TruncatedCompressedStream,

    #[error("zlib inflate failed: {0}")]
    Inflate(String),

    #[error("object has no decoded stream")]
    MissingStream,

    #[error("reference to object {0}, which is not in the document")]
    DanglingReference(u32),

    #[error("object {id} is a {found}, expected {expected}")]
    WrongReferenceKind {
        id: u32,
        found: &'static str,
        expected: &'static str,
    },

    #[error("malformed text stream: {0}")]
    MalformedText(String),
}

impl ParseErrorKind {
    pub fn category(&self) -> ErrorCategory {
        use ParseErrorKind::*;
        match self {
            DanglingReference(_) | WrongReferenceKind { .. } => ErrorCategory::Reference,
            MalformedText(_) => ErrorCategory::Content,
            TruncatedCompressedStream | Inflate(_) | MissingStream => ErrorCategory::Resource,
            _ => ErrorCategory::Structural,
        }
    }
}

/// A decoding failure together with where it happened.
///
/// Location fields are filled in as the error bubbles up: the byte reader
/// knows the offset, the tag decoder knows the tag, the loader knows the
/// object. Inner context is never overwritten by outer context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub object: Option<u32>,
    pub tag: Option<u16>,
    pub offset: Option<u64>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            object: None,
            tag: None,
            offset: None,
        }
    }

    pub fn at(mut self, offset: u64) -> Self {
        self.offset.get_or_insert(offset);
        self
    }

    pub fn with_tag(mut self, tag: u16) -> Self {
        self.tag.get_or_insert(tag);
        self
    }

    pub fn in_object(mut self, id: u32) -> Self {
        self.object.get_or_insert(id);
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl From<ParseErrorKind> for ParseError {
    fn from(kind: ParseErrorKind) -> Self {
        ParseError::new(kind)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        let mut parts = Vec::new();
        if let Some(id) = self.object {
            parts.push(format!("object {id}"));
        }
        if let Some(tag) = self.tag {
            parts.push(format!("tag {tag:#06X}"));
        }
        if let Some(offset) = self.offset {
            parts.push(format!("offset {offset:#x}"));
        }
        if !parts.is_empty() {
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
