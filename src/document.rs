//! Loading a whole LRF document into an object graph.
//!
//! Parsing runs in three phases over the object index:
//!
//! 1. every object is decoded from its tags and its stream is unpacked;
//! 2. every reference declared by a tag is checked against the table;
//! 3. pages, blocks, canvases, text and TOC objects build their content
//!    from their decoded streams.
//!
//! Structural and reference errors abort the parse. Undecodable text and
//! resources are recorded on the object and re-raised when it is used.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;

use log::{debug, warn};

use crate::content::{self, TocEntry};
use crate::error::{ParseError, ParseErrorKind, ParseResult, Result};
use crate::header::{self, LrfHeader};
use crate::info::BookInfo;
use crate::io::{ByteSource, FileSource, MemorySource};
use crate::object::{LrfObject, ObjectKind, ObjectRef, load_object};
use crate::stream::{ImageFormat, StreamInfo, TrailerPolicy};

/// Location and type of one object, as recorded in the file's object index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub object_id: u32,
    pub type_code: u16,
    pub offset: u64,
    pub size: u64,
    pub scramble_key: u16,
}

/// Parser knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub trailer: TrailerPolicy,
    /// Drop decoded streams of content objects once their content is built.
    pub release_buffers: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            trailer: TrailerPolicy::default(),
            release_buffers: true,
        }
    }
}

// ============================================================================
// Object table
// ============================================================================

/// Objects in index order, addressable by id.
#[derive(Debug, Default)]
pub struct ObjectTable {
    objects: Vec<LrfObject>,
    slots: HashMap<u32, usize>,
}

impl ObjectTable {
    pub fn from_objects(objects: Vec<LrfObject>) -> ParseResult<Self> {
        let mut table = Self::default();
        for object in objects {
            table.push(object)?;
        }
        Ok(table)
    }

    fn push(&mut self, object: LrfObject) -> ParseResult<()> {
        if self.slots.contains_key(&object.id) {
            return Err(ParseError::new(ParseErrorKind::DuplicateObject)
                .in_object(object.id)
                .at(object.offset));
        }
        self.slots.insert(object.id, self.objects.len());
        self.objects.push(object);
        Ok(())
    }

    pub fn get(&self, id: u32) -> Option<&LrfObject> {
        self.slots.get(&id).map(|&slot| &self.objects[slot])
    }

    pub fn slot(&self, id: u32) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    /// The object behind a resolved reference.
    pub fn object(&self, target: ObjectRef) -> &LrfObject {
        &self.objects[target.slot]
    }

    pub fn objects(&self) -> &[LrfObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Look up `id` and check its kind against `allowed` (empty allows any).
    pub fn resolve(
        &self,
        id: u32,
        allowed: &[ObjectKind],
        expected: &'static str,
    ) -> ParseResult<ObjectRef> {
        let slot = self
            .slot(id)
            .ok_or_else(|| ParseError::new(ParseErrorKind::DanglingReference(id)))?;
        let kind = self.objects[slot].kind;
        if !allowed.is_empty() && !allowed.contains(&kind) {
            return Err(ParseError::new(ParseErrorKind::WrongReferenceKind {
                id,
                found: kind.name(),
                expected,
            }));
        }
        Ok(ObjectRef { id, slot })
    }
}

// ============================================================================
// Document
// ============================================================================

/// A parsed LRF book.
#[derive(Debug)]
pub struct Document {
    table: ObjectTable,
    header: Option<LrfHeader>,
    info: Option<BookInfo>,
    thumbnail: Option<Vec<u8>>,
}

impl Document {
    /// Open and parse an LRF file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &ParseOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Self> {
        let source = FileSource::new(File::open(path)?)?;
        Self::from_source(&source, options)
    }

    /// Parse an LRF file held in memory.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::from_source(&MemorySource::new(bytes), &ParseOptions::default())
    }

    /// Parse a complete LRF file: header, metadata, object index, objects.
    pub fn from_source(source: &dyn ByteSource, options: &ParseOptions) -> Result<Self> {
        let head = source.read_range(0, source.len().min(header::HEADER_SIZE as u64))?;
        let lrf_header = LrfHeader::parse(&head)?;
        debug!(
            "LRF version {} with {} objects",
            lrf_header.version, lrf_header.object_count
        );

        let info = match header::read_info_bytes(source, &lrf_header) {
            Ok(Some(xml)) => match BookInfo::parse(&xml) {
                Ok(info) => Some(info),
                Err(err) => {
                    warn!("ignoring unreadable book info: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!("ignoring book info block: {err}");
                None
            }
        };
        let thumbnail = header::read_thumbnail(source, &lrf_header)?;
        let entries = header::read_object_index(source, &lrf_header)?;

        let mut document = Self::parse(source, &entries, options)?;
        document.header = Some(lrf_header);
        document.info = info;
        document.thumbnail = thumbnail;
        Ok(document)
    }

    /// Build the object graph from a byte source and its object index.
    pub fn parse(
        source: &dyn ByteSource,
        entries: &[IndexEntry],
        options: &ParseOptions,
    ) -> ParseResult<Self> {
        let mut table = load_all(source, entries, options)?;
        bind_references(&table)?;
        initialize_content(&mut table, options)?;
        Ok(Self {
            table,
            header: None,
            info: None,
            thumbnail: None,
        })
    }

    pub fn get(&self, id: u32) -> Option<&LrfObject> {
        self.table.get(id)
    }

    pub fn table(&self) -> &ObjectTable {
        &self.table
    }

    pub fn objects(&self) -> &[LrfObject] {
        self.table.objects()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn header(&self) -> Option<&LrfHeader> {
        self.header.as_ref()
    }

    pub fn info(&self) -> Option<&BookInfo> {
        self.info.as_ref()
    }

    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.thumbnail.as_deref()
    }

    pub fn objects_of(&self, kind: ObjectKind) -> impl Iterator<Item = &LrfObject> {
        self.objects().iter().filter(move |object| object.kind == kind)
    }

    pub fn book_attr(&self) -> Option<&LrfObject> {
        self.objects_of(ObjectKind::BookAttr).next()
    }

    /// The page tree holding the main reading order.
    ///
    /// This is the tree named by the BookAttr, or the first tree in the
    /// index when there is no usable BookAttr link.
    pub fn root_page_tree(&self) -> Option<&LrfObject> {
        self.book_attr()
            .and_then(LrfObject::book_attr)
            .and_then(|book| book.page_tree)
            .and_then(|id| self.get(id))
            .filter(|tree| tree.kind == ObjectKind::PageTree)
            .or_else(|| self.objects_of(ObjectKind::PageTree).next())
    }

    /// Every page tree, the root first and the rest in index order.
    pub fn page_trees(&self) -> Vec<&LrfObject> {
        let root = self.root_page_tree();
        root.into_iter()
            .chain(
                self.objects_of(ObjectKind::PageTree)
                    .filter(|tree| Some(tree.id) != root.map(|root| root.id)),
            )
            .collect()
    }

    /// Pages of `tree` in tree order.
    pub fn tree_pages(&self, tree: &LrfObject) -> Vec<&LrfObject> {
        tree.page_tree()
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.get(id))
            .collect()
    }

    /// Pages in reading order, from the root page tree.
    pub fn pages(&self) -> Vec<&LrfObject> {
        self.root_page_tree()
            .map(|tree| self.tree_pages(tree))
            .unwrap_or_default()
    }

    /// Entries of the book's table of contents.
    pub fn toc(&self) -> &[TocEntry] {
        let by_header = self
            .header
            .as_ref()
            .and_then(|header| self.get(header.toc_object_id))
            .filter(|object| object.kind == ObjectKind::Toc);
        by_header
            .or_else(|| self.objects_of(ObjectKind::Toc).next())
            .and_then(LrfObject::toc)
            .unwrap_or_default()
    }

    /// Decoded image streams by object id.
    ///
    /// Streams whose format is neither flagged nor recognisable are skipped.
    pub fn images(&self) -> BTreeMap<u32, (ImageFormat, &[u8])> {
        let mut images = BTreeMap::new();
        for object in self.objects_of(ObjectKind::ImageStream) {
            let Ok(data) = object.stream_data() else {
                continue;
            };
            match object.image_format() {
                Some(format) => {
                    images.insert(object.id, (format, data));
                }
                None => warn!("image stream {} has no recognisable format", object.id),
            }
        }
        images
    }

    /// Embedded font files by face name.
    pub fn fonts(&self) -> BTreeMap<String, &[u8]> {
        let mut fonts = BTreeMap::new();
        for object in self.objects_of(ObjectKind::Font) {
            let Ok(data) = object.stream_data() else {
                continue;
            };
            let name = object
                .attr("fontfacename")
                .and_then(|value| value.as_text())
                .map(str::to_owned)
                .unwrap_or_else(|| format!("font{}", object.id));
            fonts.insert(name, data);
        }
        fonts
    }
}

// ============================================================================
// Phases
// ============================================================================

fn load_all(
    source: &dyn ByteSource,
    entries: &[IndexEntry],
    options: &ParseOptions,
) -> ParseResult<ObjectTable> {
    let mut table = ObjectTable::default();
    for entry in entries {
        let Some(kind) = ObjectKind::from_code(entry.type_code)
            .map_err(|e| e.in_object(entry.object_id).at(entry.offset))?
        else {
            warn!(
                "skipping object {} with reserved type {:#04x}",
                entry.object_id, entry.type_code
            );
            continue;
        };

        let data = source.read_range(entry.offset, entry.size).map_err(|_| {
            ParseError::new(ParseErrorKind::ShortRead {
                needed: entry.size as usize,
                available: source.len().saturating_sub(entry.offset) as usize,
            })
            .in_object(entry.object_id)
            .at(entry.offset)
        })?;

        let mut object = load_object(&data, entry, kind, options)?;
        if let Some(stream) = &object.stream
            && stream.has_body()
            && let Err(err) = stream.data()
        {
            object.poison(err);
        }
        table.push(object)?;
    }
    Ok(table)
}

fn bind_references(table: &ObjectTable) -> ParseResult<()> {
    for object in table.objects() {
        for reference in object.references() {
            match table.resolve(reference.target, reference.allowed, reference.expected()) {
                Ok(_) => {}
                Err(err) if reference.optional => {
                    warn!("{} {}: {} link ignored: {err}", object.kind, object.id, reference.field);
                }
                Err(err) => return Err(err.in_object(object.id).at(object.offset)),
            }
        }
    }
    Ok(())
}

fn initialize_content(table: &mut ObjectTable, options: &ParseOptions) -> ParseResult<()> {
    for slot in 0..table.len() {
        let object = &mut table.objects[slot];
        if !content::has_content(object.kind) || object.error().is_some() {
            continue;
        }
        let bytes = match object.stream.as_mut().and_then(StreamInfo::take) {
            Some(Ok(bytes)) => bytes,
            Some(Err(_)) => continue,
            None => Vec::new(),
        };

        let built = content::initialize(table, &table.objects[slot], &bytes);
        let object = &mut table.objects[slot];
        match built {
            Ok(Some(body)) => object.body = body,
            Ok(None) => {}
            Err(err) if err.category().aborts_document() => {
                return Err(err.in_object(object.id).at(object.offset));
            }
            Err(err) => object.poison(err),
        }
        if (!options.release_buffers || object.kind.keeps_stream())
            && let Some(stream) = object.stream.as_mut()
        {
            stream.set_decoded(Ok(bytes));
        }
    }
    Ok(())
}
