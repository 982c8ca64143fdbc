//! End-to-end parsing of synthetic LRF files.

mod common;

use std::io::Write;

use common::{FONT, JPEG, Object, Tags, first_text, sample_book};
use lrf::content::PageItem;
use lrf::io::MemorySource;
use lrf::stream::{descramble, descramble_key};
use lrf::text::{Node, plain_text};
use lrf::{Binding, Document, ImageFormat, ObjectKind, ParseOptions};

// ============================================================================
// Framing
// ============================================================================

#[test]
fn test_header_fields() {
    let doc = Document::from_bytes(sample_book().build()).expect("sample book should parse");
    let header = doc.header().expect("header");

    assert_eq!(header.version, 999);
    assert_eq!(header.xor_key, 0x30);
    assert_eq!(header.binding, Binding::Lr);
    assert_eq!((header.width, header.height, header.dpi), (600, 775, 1660));
    assert_eq!(header.color_depth, 24);
    assert_eq!(header.toc_object_id, 70);
    assert_eq!(header.object_count as usize, doc.len());
}

#[test]
fn test_book_info() {
    let doc = Document::from_bytes(sample_book().build()).unwrap();
    let info = doc.info().expect("metadata block");

    assert_eq!(info.title, "Sample Book");
    assert_eq!(info.title_reading.as_deref(), Some("SAMPLE"));
    assert_eq!(info.author, "A. Writer");
    assert_eq!(info.publisher.as_deref(), Some("Acme & Sons"));
    assert_eq!(info.language.as_deref(), Some("en"));
    assert_eq!(info.page_count, Some(2));
}

#[test]
fn test_missing_info_is_none() {
    let mut book = sample_book();
    book.info_xml = None;
    let doc = Document::from_bytes(book.build()).unwrap();
    assert!(doc.info().is_none());
    assert_eq!(doc.pages().len(), 2);
}

#[test]
fn test_thumbnail() {
    let mut book = sample_book();
    book.thumbnail = Some((0x11, JPEG.to_vec()));
    let doc = Document::from_bytes(book.build()).unwrap();

    assert_eq!(doc.thumbnail(), Some(JPEG));
    assert_eq!(
        doc.header().and_then(|h| h.thumbnail_format()),
        Some(ImageFormat::Jpeg)
    );
}

#[test]
fn test_open_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&sample_book().build()).unwrap();
    file.flush().unwrap();

    let doc = Document::open(file.path()).unwrap();
    assert_eq!(doc.pages().len(), 2);
    assert_eq!(doc.info().map(|i| i.title.as_str()), Some("Sample Book"));
}

// ============================================================================
// Object graph
// ============================================================================

#[test]
fn test_pages_in_tree_order() {
    let doc = Document::from_bytes(sample_book().build()).unwrap();
    let ids: Vec<u32> = doc.pages().iter().map(|page| page.id).collect();
    assert_eq!(ids, vec![10, 11]);
}

#[test]
fn test_page_content() {
    let doc = Document::from_bytes(sample_book().build()).unwrap();
    let page = doc.get(10).and_then(|object| object.page()).expect("page 10");

    assert_eq!(page.parent, Some(2));
    assert_eq!(page.content.len(), 3);
    assert!(matches!(page.content[0], PageItem::Object(target) if target.id == 40));
    assert_eq!(
        page.content[1],
        PageItem::BlockSpace {
            xspace: 0,
            yspace: 30
        }
    );
    assert!(matches!(page.content[2], PageItem::Object(target) if target.id == 41));
}

#[test]
fn test_block_content() {
    let doc = Document::from_bytes(sample_book().build()).unwrap();

    let text_block = doc.get(40).and_then(|object| object.block()).unwrap();
    assert_eq!(text_block.content.id, 50);
    assert_eq!(text_block.text_style, Some(5));

    let image_block = doc.get(42).and_then(|object| object.block()).unwrap();
    let image = image_block.image.expect("image geometry");
    assert_eq!((image.xsize, image.ysize), (600, 800));
    assert_eq!(image.refstream, Some(53));
}

#[test]
fn test_text_nodes() {
    let doc = Document::from_bytes(sample_book().build()).unwrap();

    let first = doc.get(50).unwrap().text_nodes().unwrap();
    assert_eq!(plain_text(first), "Hello world");
    assert!(matches!(&first[0], Node::Open(tag) if tag.name == "P"));

    // Stored compressed in the file.
    let second = doc.get(51).unwrap().text_nodes().unwrap();
    assert_eq!(plain_text(second), "Second\nline big");
}

#[test]
fn test_toc() {
    let doc = Document::from_bytes(sample_book().build()).unwrap();
    let toc = doc.toc();

    assert_eq!(toc.len(), 1);
    assert_eq!(toc[0].label, "Chapter 1");
    assert_eq!(toc[0].page.id, 10);
    assert_eq!(toc[0].object.id, 40);
}

#[test]
fn test_images_and_fonts() {
    let doc = Document::from_bytes(sample_book().build()).unwrap();

    let images = doc.images();
    assert_eq!(images.len(), 1);
    assert_eq!(images[&53], (ImageFormat::Jpeg, JPEG));

    let fonts = doc.fonts();
    assert_eq!(fonts.get("Dummy Sans").copied(), Some(FONT));

    let book = doc.book_attr().and_then(|object| object.book_attr()).unwrap();
    assert_eq!(book.page_tree, Some(2));
    assert_eq!(book.fonts, vec![60]);
}

#[test]
fn test_content_streams_released_by_default() {
    let bytes = sample_book().build();

    let doc = Document::from_bytes(bytes.clone()).unwrap();
    assert!(doc.get(50).unwrap().stream_data().is_err());
    // Resources keep their data.
    assert_eq!(doc.get(53).unwrap().stream_data().unwrap(), JPEG);

    let options = ParseOptions {
        release_buffers: false,
        ..ParseOptions::default()
    };
    let doc = Document::from_source(&MemorySource::new(bytes), &options).unwrap();
    assert_eq!(doc.get(50).unwrap().stream_data().unwrap(), first_text().as_slice());
}

#[test]
fn test_scrambled_text_stream() {
    let mut body = first_text();
    let key = descramble_key(0x30, body.len());
    descramble(&mut body, key, None);

    let mut book = sample_book();
    book.objects.retain(|object| object.id != 50);
    book.objects.push(
        Object::new(50, 0x0A)
            .with(|t| t.dword(0xF503, 5))
            .stream(0x0200, &body),
    );

    let doc = Document::from_bytes(book.build()).unwrap();
    assert_eq!(plain_text(doc.get(50).unwrap().text_nodes().unwrap()), "Hello world");
}

#[test]
fn test_reserved_object_type_is_skipped() {
    let book = sample_book().object(Object::new(90, 0x09));
    let doc = Document::from_bytes(book.build()).unwrap();

    assert!(doc.get(90).is_none());
    assert_eq!(doc.objects_of(ObjectKind::Page).count(), 2);
}

#[test]
fn test_canvas_placement() {
    let canvas_stream = Tags::new()
        .tag(0xF549, &{
            let mut record = Vec::new();
            record.extend(10u16.to_le_bytes());
            record.extend(20u16.to_le_bytes());
            record.extend(40u32.to_le_bytes());
            record
        })
        .bytes();
    let book = sample_book().object(
        Object::new(80, 0x0D)
            .with(|t| t.word(0xF551, 300).word(0xF552, 200))
            .stream(0, &canvas_stream),
    );

    let doc = Document::from_bytes(book.build()).unwrap();
    let canvas = doc.get(80).unwrap();
    let puts = canvas.canvas().unwrap();
    assert_eq!(puts.len(), 1);
    assert_eq!((puts[0].x, puts[0].y, puts[0].target.id), (10, 20, 40));
    assert_eq!(canvas.attr("canvaswidth").and_then(|v| v.as_int()), Some(300));
}
