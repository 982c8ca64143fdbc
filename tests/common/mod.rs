//! Synthetic LRF files for integration tests.

#![allow(dead_code)]

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

pub const HEADER_SIZE: usize = 0x58;

pub fn utf16(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// A compressed stream body: uncompressed length then zlib data.
pub fn compressed(data: &[u8]) -> Vec<u8> {
    let mut out = (data.len() as u32).to_le_bytes().to_vec();
    out.extend(zlib(data));
    out
}

/// Byte-level builder for tag sequences.
#[derive(Debug, Clone, Default)]
pub struct Tags(pub Vec<u8>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, id: u16, payload: &[u8]) -> Self {
        self.0.extend(id.to_le_bytes());
        self.0.extend(payload);
        self
    }

    pub fn word(self, id: u16, value: u16) -> Self {
        self.tag(id, &value.to_le_bytes())
    }

    pub fn dword(self, id: u16, value: u32) -> Self {
        self.tag(id, &value.to_le_bytes())
    }

    pub fn ids(self, id: u16, ids: &[u32]) -> Self {
        let mut payload = (ids.len() as u16).to_le_bytes().to_vec();
        for id in ids {
            payload.extend(id.to_le_bytes());
        }
        self.tag(id, &payload)
    }

    pub fn string(self, id: u16, text: &str) -> Self {
        let encoded = utf16(text);
        let mut payload = (encoded.len() as u16).to_le_bytes().to_vec();
        payload.extend(encoded);
        self.tag(id, &payload)
    }

    /// Raw UTF-16LE characters, as found between tags in text streams.
    pub fn text(mut self, text: &str) -> Self {
        self.0.extend(utf16(text));
        self
    }

    pub fn bytes(self) -> Vec<u8> {
        self.0
    }
}

/// One object record.
#[derive(Debug, Clone)]
pub struct Object {
    pub id: u32,
    pub type_code: u16,
    pub tags: Tags,
}

impl Object {
    pub fn new(id: u32, type_code: u16) -> Self {
        Self {
            id,
            type_code,
            tags: Tags::new(),
        }
    }

    pub fn with(mut self, f: impl FnOnce(Tags) -> Tags) -> Self {
        self.tags = f(self.tags);
        self
    }

    /// Append a stream with the given flags and already-encoded body.
    pub fn stream(self, flags: u16, body: &[u8]) -> Self {
        self.with(|tags| {
            tags.word(0xF554, flags)
                .dword(0xF504, body.len() as u32)
                .tag(0xF505, body)
                .tag(0xF506, &[])
        })
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(0xF500u16.to_le_bytes());
        out.extend(self.id.to_le_bytes());
        out.extend(self.type_code.to_le_bytes());
        out.extend(&self.tags.0);
        out.extend(0xF501u16.to_le_bytes());
        out
    }
}

/// Assembles a complete LRF file.
#[derive(Debug, Clone)]
pub struct LrfBuilder {
    pub version: u16,
    pub xor_key: u16,
    pub toc_object_id: u32,
    pub info_xml: Option<String>,
    pub thumbnail: Option<(u16, Vec<u8>)>,
    pub objects: Vec<Object>,
}

impl Default for LrfBuilder {
    fn default() -> Self {
        Self {
            version: 999,
            xor_key: 0x30,
            toc_object_id: 0,
            info_xml: None,
            thumbnail: None,
            objects: Vec::new(),
        }
    }
}

impl LrfBuilder {
    pub fn object(mut self, object: Object) -> Self {
        self.objects.push(object);
        self
    }

    pub fn info(mut self, xml: &str) -> Self {
        self.info_xml = Some(xml.to_owned());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut header = vec![0u8; HEADER_SIZE];
        header[..8].copy_from_slice(b"L\0R\0F\0\0\0");
        put_u16(&mut header, 0x08, self.version);
        put_u16(&mut header, 0x0A, self.xor_key);
        put_u32(&mut header, 0x0C, self.objects.first().map_or(0, |o| o.id));
        header[0x10..0x18].copy_from_slice(&(self.objects.len() as u64).to_le_bytes());
        header[0x24] = 1;
        put_u16(&mut header, 0x26, 1660);
        put_u16(&mut header, 0x2A, 600);
        put_u16(&mut header, 0x2C, 775);
        header[0x2E] = 24;
        put_u32(&mut header, 0x44, self.toc_object_id);

        let mut file = header;
        if let Some(xml) = &self.info_xml {
            let mut encoded = vec![0xFF, 0xFE];
            encoded.extend(utf16(xml));
            let packed = zlib(&encoded);
            put_u16(&mut file, 0x4C, (packed.len() + 4) as u16);
            put_u32(&mut file, 0x54, encoded.len() as u32);
            file.extend(&packed);
        }
        if let Some((kind, data)) = &self.thumbnail {
            put_u16(&mut file, 0x4E, *kind);
            put_u32(&mut file, 0x50, data.len() as u32);
            file.extend(data);
        }

        let mut index = Vec::new();
        for object in &self.objects {
            let bytes = object.bytes();
            index.extend(object.id.to_le_bytes());
            index.extend((file.len() as u32).to_le_bytes());
            index.extend((bytes.len() as u32).to_le_bytes());
            index.extend(0u32.to_le_bytes());
            file.extend(bytes);
        }
        let index_offset = file.len() as u64;
        file[0x18..0x20].copy_from_slice(&index_offset.to_le_bytes());
        file.extend(index);
        file
    }
}

fn put_u16(buf: &mut [u8], at: usize, value: u16) {
    buf[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

pub const BOOK_INFO: &str = "<?xml version=\"1.0\" encoding=\"UTF-16\"?>\
<Info version=\"1.1\"><BookInfo>\
<Title reading=\"SAMPLE\">Sample Book</Title>\
<Author reading=\"WRITER, A\">A. Writer</Author>\
<BookID>FB0123456789</BookID>\
<Publisher>Acme &amp; Sons</Publisher>\
</BookInfo><DocInfo>\
<Language>en</Language>\
<Creator>lrf tests</Creator>\
<SumPage>2</SumPage>\
</DocInfo></Info>";

pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0xFF, 0xD9];
pub const FONT: &[u8] = b"\x00\x01\x00\x00font";

/// Text stream: `<P>Hello <Italic>world</Italic></P>`.
pub fn first_text() -> Vec<u8> {
    Tags::new()
        .tag(0xF5A1, &[0, 0, 0, 0])
        .text("Hello ")
        .tag(0xF581, &[])
        .text("world")
        .tag(0xF582, &[])
        .tag(0xF5A2, &[])
        .bytes()
}

/// Text stream: `<P>Second<CR/>line <Span fontsize=140>big</Span></P>`.
pub fn second_text() -> Vec<u8> {
    Tags::new()
        .tag(0xF5A1, &[0, 0, 0, 0])
        .text("Second")
        .tag(0xF5D2, &[])
        .text("line ")
        .word(0xF511, 140)
        .text("big")
        .word(0xF511, 100)
        .tag(0xF5A2, &[])
        .bytes()
}

fn toc_stream() -> Vec<u8> {
    let label = utf16("Chapter 1");
    let mut stream = 1u16.to_le_bytes().to_vec();
    stream.extend([0, 0]);
    stream.extend(8u32.to_le_bytes());
    stream.extend(10u32.to_le_bytes());
    stream.extend(40u32.to_le_bytes());
    stream.extend((label.len() as u16).to_le_bytes());
    stream.extend(label);
    stream
}

/// A two-page book with text, an image, a font and a TOC.
///
/// | id | kind |
/// |----|------|
/// | 1 | BookAttr |
/// | 2 | PageTree (10, 11) |
/// | 3 | PageAttr |
/// | 4 | BlockAttr |
/// | 5 | TextAttr |
/// | 10, 11 | Page |
/// | 40, 41 | text Block |
/// | 42 | image Block |
/// | 50, 51 | Text (51 compressed) |
/// | 52 | Image |
/// | 53 | ImageStream (JPEG) |
/// | 60 | Font |
/// | 70 | TOC |
pub fn sample_book() -> LrfBuilder {
    LrfBuilder {
        toc_object_id: 70,
        ..LrfBuilder::default()
    }
    .info(BOOK_INFO)
    .object(Object::new(1, 0x1C).with(|t| t.dword(0xF57B, 2).dword(0xF5D8, 60)))
    .object(Object::new(2, 0x01).with(|t| t.ids(0xF55C, &[10, 11])))
    .object(Object::new(3, 0x05).with(|t| t.word(0xF521, 20)))
    .object(Object::new(4, 0x07).with(|t| t.word(0xF539, 20)))
    .object(Object::new(5, 0x0B).with(|t| t.word(0xF511, 100).word(0xF515, 700)))
    .object(
        Object::new(10, 0x02)
            .with(|t| t.dword(0xF503, 3).dword(0xF57C, 2))
            .stream(0, &Tags::new().dword(0xF503, 40).word(0xF546, 30).dword(0xF503, 41).bytes()),
    )
    .object(
        Object::new(11, 0x02)
            .with(|t| t.dword(0xF503, 3).dword(0xF57C, 2))
            .stream(0, &Tags::new().dword(0xF503, 42).bytes()),
    )
    .object(
        Object::new(40, 0x06)
            .with(|t| t.dword(0xF503, 4))
            .stream(0, &Tags::new().dword(0xF503, 50).bytes()),
    )
    .object(
        Object::new(41, 0x06)
            .with(|t| t.dword(0xF503, 4))
            .stream(0, &Tags::new().dword(0xF503, 51).bytes()),
    )
    .object(
        Object::new(42, 0x06)
            .with(|t| t.dword(0xF503, 4))
            .stream(0, &Tags::new().dword(0xF503, 52).bytes()),
    )
    .object(
        Object::new(50, 0x0A)
            .with(|t| t.dword(0xF503, 5))
            .stream(0, &first_text()),
    )
    .object(
        Object::new(51, 0x0A)
            .with(|t| t.dword(0xF503, 5))
            .stream(0x0100, &compressed(&second_text())),
    )
    .object(Object::new(52, 0x0C).with(|t| {
        let mut rect = Vec::new();
        for v in [0u16, 0, 600, 800] {
            rect.extend(v.to_le_bytes());
        }
        let mut size = Vec::new();
        for v in [600u16, 800] {
            size.extend(v.to_le_bytes());
        }
        t.tag(0xF54A, &rect).tag(0xF54B, &size).dword(0xF54C, 53)
    }))
    .object(Object::new(53, 0x11).stream(0x11, JPEG))
    .object(
        Object::new(60, 0x19)
            .with(|t| t.string(0xF559, "dummy.ttf").string(0xF55D, "Dummy Sans"))
            .stream(0, FONT),
    )
    .object(Object::new(70, 0x1E).stream(0, &toc_stream()))
}
