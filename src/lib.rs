//! # lrf
//!
//! A reader for Sony BBeB (LRF) ebooks.
//!
//! ## Features
//!
//! - Parse the LRF container: header, zlib-compressed book metadata,
//!   thumbnail and object index
//! - Decode every object into a typed graph with bound references
//! - Interpret text streams into balanced inline markup
//! - Export LRS-XML or HTML with a generated stylesheet
//! - Extract embedded images and fonts
//!
//! ## Quick Start
//!
//! ```no_run
//! use lrf::Document;
//! use lrf::export::{ExportConfig, to_html, to_lrs};
//!
//! let doc = Document::open("book.lrf")?;
//! if let Some(info) = doc.info() {
//!     println!("{} by {}", info.title, info.author);
//! }
//!
//! let xml = to_lrs(&doc, &ExportConfig::default())?;
//! let html = to_html(&doc, &ExportConfig::default())?;
//! # Ok::<(), lrf::Error>(())
//! ```
//!
//! ## Working with Objects
//!
//! Parsing is strict about the file's structure and its links, and lenient
//! about content: a text stream that cannot be interpreted, or an image
//! whose stream cannot be decoded, is recorded on its object and only
//! reported when that object is used.
//!
//! ```no_run
//! use lrf::{Document, ObjectKind};
//!
//! let doc = Document::open("book.lrf")?;
//! for text in doc.objects_of(ObjectKind::Text) {
//!     match text.text_nodes() {
//!         Ok(nodes) => println!("{}: {}", text.id, lrf::text::plain_text(nodes)),
//!         Err(err) => eprintln!("{err}"),
//!     }
//! }
//! # Ok::<(), lrf::Error>(())
//! ```

pub mod content;
pub mod document;
pub mod error;
pub mod export;
pub mod header;
pub mod info;
pub mod io;
pub mod object;
pub mod schema;
pub mod stream;
pub mod style;
pub mod tag;
pub mod text;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use document::{Document, IndexEntry, ObjectTable, ParseOptions};
pub use error::{Error, ErrorCategory, ParseError, ParseErrorKind, ParseResult, Result};
pub use header::{Binding, LrfHeader};
pub use info::BookInfo;
pub use object::{LrfObject, ObjectBody, ObjectKind, ObjectRef};
pub use stream::{ImageFormat, TrailerPolicy};
