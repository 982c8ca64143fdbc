//! LRS-XML and HTML output for a synthetic book.

mod common;

use common::{Object, Tags, first_text, sample_book};
use lrf::Document;
use lrf::export::{ExportConfig, generate_css, object_to_html, object_to_lrs, to_html, to_lrs};

fn sample() -> Document {
    Document::from_bytes(sample_book().build()).expect("sample book should parse")
}

fn compact() -> ExportConfig {
    ExportConfig {
        pretty: false,
        ..ExportConfig::default()
    }
}

// ============================================================================
// LRS-XML
// ============================================================================

#[test]
fn test_lrs_skeleton() {
    let xml = to_lrs(&sample(), &ExportConfig::default()).unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<BBeBXylog version=\"1.0\">"));
    let order = ["<BookInformation>", "<Main>", "<Template", "<Style>", "<Objects>", "<TOC>"];
    let positions: Vec<usize> = order
        .iter()
        .map(|needle| xml.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "sections out of order");
    assert!(xml.trim_end().ends_with("</BBeBXylog>"));
}

#[test]
fn test_lrs_book_information() {
    let xml = to_lrs(&sample(), &compact()).unwrap();

    assert!(xml.contains("<Title reading=\"SAMPLE\">Sample Book</Title>"));
    assert!(xml.contains("<Author reading=\"WRITER, A\">A. Writer</Author>"));
    assert!(xml.contains("<Publisher>Acme &amp; Sons</Publisher>"));
    assert!(xml.contains("<SumPage>2</SumPage>"));
}

#[test]
fn test_lrs_pages_inline_their_blocks() {
    let xml = to_lrs(&sample(), &compact()).unwrap();

    assert!(xml.contains(
        "<Page objid=\"10\" pagestyle=\"3\">\
         <TextBlock objid=\"40\" blockstyle=\"4\" textstyle=\"5\"><P>Hello <Italic>world</Italic></P></TextBlock>\
         <BlockSpace xspace=\"0\" yspace=\"30\"/>\
         <TextBlock objid=\"41\" blockstyle=\"4\" textstyle=\"5\"><P>Second<CR/>line <Span fontsize=\"140\">big</Span></P></TextBlock>\
         </Page>"
    ));
    assert!(xml.contains(
        "<ImageBlock objid=\"42\" blockstyle=\"4\" x0=\"0\" y0=\"0\" x1=\"600\" y1=\"800\" \
         xsize=\"600\" ysize=\"800\" refstream=\"53\" refobj=\"52\"/>"
    ));
}

#[test]
fn test_lrs_styles() {
    let xml = to_lrs(&sample(), &compact()).unwrap();

    assert!(xml.contains(
        "<BookSetting bindingdirection=\"Lr\" dpi=\"1660\" screenwidth=\"600\" \
         screenheight=\"775\" colordepth=\"24\"/>"
    ));
    assert!(xml.contains(
        "<RegistFont objid=\"60\" fontfilename=\"dummy.ttf\" fontfacename=\"Dummy Sans\" \
         file=\"Dummy Sans.ttf\" encoding=\"TTF\"/>"
    ));
    assert!(xml.contains("<TextStyle objid=\"5\" stylelabel=\"5\" fontsize=\"100\" fontweight=\"700\"/>"));
    assert!(xml.contains("<BlockStyle objid=\"4\" stylelabel=\"4\" sidemargin=\"20\"/>"));
    assert!(xml.contains("<PageStyle objid=\"3\" stylelabel=\"3\" topmargin=\"20\"/>"));
}

#[test]
fn test_lrs_objects_and_toc() {
    let xml = to_lrs(&sample(), &compact()).unwrap();
    let objects = &xml[xml.find("<Objects>").unwrap()..xml.find("</Objects>").unwrap()];

    // Blocks already written inside pages are not repeated.
    assert!(!objects.contains("objid=\"40\""));
    assert!(!objects.contains("objid=\"52\""));
    assert!(objects.contains("<ImageStream objid=\"53\" encoding=\"JPEG\" file=\"53.jpeg\"/>"));
    assert!(xml.contains("<TocLabel refpage=\"10\" refobj=\"40\">Chapter 1</TocLabel>"));
}

/// The sample book plus a second page tree (12) listed before the root one.
fn two_tree_book() -> Document {
    let mut book = sample_book()
        .object(
            Object::new(13, 0x02)
                .with(|t| t.dword(0xF503, 3).dword(0xF57C, 12))
                .stream(0, &Tags::new().dword(0xF503, 44).bytes()),
        )
        .object(
            Object::new(44, 0x06)
                .with(|t| t.dword(0xF503, 4))
                .stream(0, &Tags::new().dword(0xF503, 54).bytes()),
        )
        .object(
            Object::new(54, 0x0A)
                .with(|t| t.dword(0xF503, 5))
                .stream(0, &first_text()),
        );
    book.objects
        .insert(1, Object::new(12, 0x01).with(|t| t.ids(0xF55C, &[13])));
    Document::from_bytes(book.build()).expect("two-tree book should parse")
}

#[test]
fn test_root_page_tree_from_book_attr() {
    let doc = two_tree_book();
    let trees: Vec<u32> = doc.page_trees().iter().map(|tree| tree.id).collect();
    assert_eq!(trees, vec![2, 12]);
    let pages: Vec<u32> = doc.pages().iter().map(|page| page.id).collect();
    assert_eq!(pages, vec![10, 11]);
}

#[test]
fn test_lrs_secondary_page_tree() {
    let xml = to_lrs(&two_tree_book(), &compact()).unwrap();
    let main = &xml[xml.find("<Main>").unwrap()..xml.find("</Main>").unwrap()];
    let objects = &xml[xml.find("<Objects>").unwrap()..xml.find("</Objects>").unwrap()];

    assert!(main.contains("<Page objid=\"10\""));
    assert!(!main.contains("objid=\"13\""));
    assert!(!main.contains("PageTree"));
    assert!(objects.starts_with(
        "<Objects><PageTree objid=\"12\"><Page objid=\"13\" pagestyle=\"3\">\
         <TextBlock objid=\"44\" blockstyle=\"4\" textstyle=\"5\"><P>Hello <Italic>world</Italic></P></TextBlock>\
         </Page></PageTree>"
    ));
    assert_eq!(xml.matches("objid=\"44\"").count(), 1);
}

#[test]
fn test_html_renders_every_page_tree() {
    let html = to_html(&two_tree_book(), &compact()).unwrap();
    let ids: Vec<usize> = ["page10", "page11", "page13"]
        .iter()
        .map(|id| html.find(&format!("id=\"{id}\"")).unwrap())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_font_file_names_match_extraction() {
    let mut book = sample_book();
    book.objects.retain(|object| object.id != 60);
    book.objects.push(
        Object::new(60, 0x19)
            .with(|t| t.string(0xF559, "dummy.ttf").string(0xF55D, "Serif/Bold"))
            .stream(0, common::FONT),
    );
    let doc = Document::from_bytes(book.build()).unwrap();

    let font = doc.get(60).unwrap();
    assert_eq!(font.file_name().as_deref(), Some("Serif_Bold.ttf"));
    let xml = to_lrs(&doc, &compact()).unwrap();
    assert!(xml.contains("file=\"Serif_Bold.ttf\""));
    assert_eq!(doc.get(53).unwrap().file_name().as_deref(), Some("53.jpeg"));
}

#[test]
fn test_lrs_pretty_indentation() {
    let xml = to_lrs(&sample(), &ExportConfig::default()).unwrap();
    assert!(xml.contains("\n  <Main>\n    <Page objid=\"10\" pagestyle=\"3\">\n      <TextBlock"));
}

#[test]
fn test_object_to_lrs() {
    let doc = sample();
    let text = doc.get(50).unwrap();
    let xml = object_to_lrs(&doc, text, &compact()).unwrap();
    assert_eq!(
        xml,
        "<Text objid=\"50\" textstyle=\"5\"><P>Hello <Italic>world</Italic></P></Text>"
    );
}

// ============================================================================
// HTML
// ============================================================================

#[test]
fn test_css_from_styles() {
    let css = generate_css(&sample(), &ExportConfig::default().font_map);

    assert!(css.stylesheet.contains(".block4 { margin-left: 20px; margin-right: 20px; }"));
    assert!(css.stylesheet.contains(".text5 { font-size: 10pt; font-weight: bold; }"));
    assert_eq!(css.class_name(4), Some("block4"));
}

#[test]
fn test_html_document() {
    let html = to_html(&sample(), &compact()).unwrap();

    assert!(html.starts_with("<!DOCTYPE html><html><head><meta charset=\"utf-8\"/>"));
    assert!(html.contains("<title>Sample Book</title>"));
    assert!(html.contains("<style>.block4 {"));
    assert_eq!(html.matches("<div class=\"page\"").count(), 2);
    assert!(html.contains("<div class=\"page\" id=\"page10\">"));
}

#[test]
fn test_html_text_blocks() {
    let html = to_html(&sample(), &compact()).unwrap();

    assert!(html.contains("<div class=\"block4 text5\"><p>Hello <i>world</i></p></div>"));
    assert!(html.contains(
        "<p>Second<br/>line <span style=\"font-size: 14pt;\">big</span></p>"
    ));
    assert!(html.contains("<img src=\"53.jpeg\" width=\"600\" height=\"800\"/>"));
}

#[test]
fn test_object_to_html() {
    let doc = sample();
    let block = doc.get(40).unwrap();
    let html = object_to_html(&doc, block, &compact()).unwrap();
    assert_eq!(html, "<div class=\"block4 text5\"><p>Hello <i>world</i></p></div>");
}
