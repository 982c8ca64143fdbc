//! Book metadata from the compressed `Info` XML block.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::Result;
use crate::text::resolve_entity;
use crate::util::{decode_text, decode_utf16le, extract_xml_encoding};

/// Metadata stored in the LRF header block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct BookInfo {
    pub title: String,
    pub title_reading: Option<String>,
    pub author: String,
    pub author_reading: Option<String>,
    pub book_id: Option<String>,
    pub publisher: Option<String>,
    pub label: Option<String>,
    pub category: Option<String>,
    pub classification: Option<String>,
    pub free_text: Option<String>,
    pub language: Option<String>,
    pub creator: Option<String>,
    pub creation_date: Option<String>,
    pub producer: Option<String>,
    pub page_count: Option<u32>,
}

impl BookInfo {
    /// Parse the inflated metadata block.
    ///
    /// The block is usually UTF-16 with a BOM; some producers drop the BOM.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let content = if bytes.starts_with(b"<\0") {
            Cow::Owned(decode_utf16le(bytes))
        } else {
            decode_text(bytes, extract_xml_encoding(bytes))
        };
        // Untrimmed: entity references split text events.
        let mut reader = Reader::from_str(&content);

        let mut info = BookInfo::default();
        let mut current: Option<Vec<u8>> = None;
        let mut reading: Option<String> = None;
        let mut buf_text = String::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    current = Some(e.name().as_ref().to_vec());
                    reading = reading_attr(&e);
                    buf_text.clear();
                }
                Event::Text(e) => {
                    if current.is_some() {
                        buf_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Event::GeneralRef(e) => {
                    if current.is_some()
                        && let Some(ch) = resolve_entity(&String::from_utf8_lossy(e.as_ref()))
                    {
                        buf_text.push(ch);
                    }
                }
                Event::End(_) => {
                    if let Some(name) = current.take() {
                        info.set(&name, std::mem::take(&mut buf_text), reading.take());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(info)
    }

    fn set(&mut self, element: &[u8], value: String, reading: Option<String>) {
        let value = value.trim().to_owned();
        match element {
            b"Title" => {
                self.title = value;
                self.title_reading = reading;
            }
            b"Author" => {
                self.author = value;
                self.author_reading = reading;
            }
            b"BookID" => self.book_id = Some(value),
            b"Publisher" => self.publisher = Some(value),
            b"Label" => self.label = Some(value),
            b"Category" => self.category = Some(value),
            b"Classification" => self.classification = Some(value),
            b"FreeText" => self.free_text = Some(value),
            b"Language" => self.language = Some(value),
            b"Creator" => self.creator = Some(value),
            b"CreationDate" => self.creation_date = Some(value),
            b"Producer" => self.producer = Some(value),
            b"SumPage" => self.page_count = value.parse().ok(),
            _ => {}
        }
    }
}

fn reading_attr(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"reading")
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
        .filter(|value| !value.is_empty())
}
