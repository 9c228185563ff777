//! Integration tests for pdf-core
//!
//! Documents are written to bytes and parsed back with lopdf.

use lopdf::Document;
use pdf_core::{Align, FontFamily, FontWeight, PageSize, PdfDocument, PdfError};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn new_document(pages: usize) -> PdfDocument {
    let mut doc = PdfDocument::new(PageSize::A4);
    doc.add_font_family("helvetica", FontFamily::helvetica())
        .expect("Failed to add font family");
    for _ in 0..pages {
        doc.add_page().expect("Failed to add page");
    }
    doc.set_font("helvetica", 10.0).expect("Failed to set font");
    doc
}

/// Create a small RGB PNG
fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut buffer = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .expect("Failed to encode PNG");
    buffer
}

/// Create a small RGB JPEG
fn create_test_jpeg() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 120, 200]));
    let mut buffer = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Jpeg)
        .expect("Failed to encode JPEG");
    buffer
}

fn page_content(pdf: &Document, page: u32) -> String {
    let pages = pdf.get_pages();
    let content = pdf
        .get_page_content(pages[&page])
        .expect("Failed to read page content");
    String::from_utf8_lossy(&content).into_owned()
}

fn page_resources(pdf: &Document, page: u32) -> lopdf::Dictionary {
    let pages = pdf.get_pages();
    let page_dict = pdf.get_dictionary(pages[&page]).expect("Page is not a dictionary");
    page_dict
        .get(b"Resources")
        .and_then(|r| r.as_dict())
        .expect("Page has no Resources")
        .clone()
}

#[test]
fn test_save_and_reload_pages() {
    let mut doc = new_document(2);
    doc.insert_text("Page one", 1, 40.0, 60.0, Align::Left).unwrap();
    doc.insert_text("Page two", 2, 40.0, 60.0, Align::Left).unwrap();

    let bytes = doc.to_bytes().expect("Failed to save PDF");
    let pdf = Document::load_mem(&bytes).expect("Failed to re-open PDF");

    assert_eq!(pdf.get_pages().len(), 2);
    assert!(page_content(&pdf, 1).contains("40 782 Td"));
    assert!(page_content(&pdf, 2).contains("BT"));
}

#[test]
fn test_media_box_is_a4() {
    let mut doc = new_document(1);
    let bytes = doc.to_bytes().unwrap();
    let pdf = Document::load_mem(&bytes).unwrap();

    let pages = pdf.get_pages();
    let page = pdf.get_dictionary(pages[&1]).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    let height = match &media_box[3] {
        lopdf::Object::Real(v) => *v as f64,
        lopdf::Object::Integer(v) => *v as f64,
        other => panic!("unexpected MediaBox entry {other:?}"),
    };
    assert_eq!(height, 842.0);
}

#[test]
fn test_standard_fonts_are_not_embedded() {
    let mut doc = new_document(1);
    doc.insert_text("Regular", 1, 40.0, 60.0, Align::Left).unwrap();
    doc.set_font_weight(FontWeight::Bold).unwrap();
    doc.insert_text("Bold", 1, 40.0, 80.0, Align::Left).unwrap();

    let bytes = doc.to_bytes().unwrap();
    let pdf = Document::load_mem(&bytes).unwrap();

    let resources = page_resources(&pdf, 1);
    let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
    let mut base_fonts: Vec<Vec<u8>> = fonts
        .iter()
        .map(|(_, value)| {
            let id = value.as_reference().unwrap();
            let font = pdf.get_dictionary(id).unwrap();
            assert!(font.get(b"FontDescriptor").is_err());
            font.get(b"BaseFont").unwrap().as_name().unwrap().to_vec()
        })
        .collect();
    base_fonts.sort();

    assert_eq!(
        base_fonts,
        vec![b"Helvetica".to_vec(), b"Helvetica-Bold".to_vec()]
    );
}

#[test]
fn test_font_resources_only_on_pages_that_use_them() {
    let mut doc = new_document(2);
    doc.insert_text("Text", 1, 40.0, 60.0, Align::Left).unwrap();
    doc.draw_line(2, 40.0, 100.0, 555.0, 100.0, 1.0).unwrap();

    let bytes = doc.to_bytes().unwrap();
    let pdf = Document::load_mem(&bytes).unwrap();

    assert!(page_resources(&pdf, 1).get(b"Font").is_ok());
    assert!(page_resources(&pdf, 2).get(b"Font").is_err());
    assert!(page_content(&pdf, 2).contains("40 742 m"));
}

#[test]
fn test_insert_image_png_and_jpeg() {
    let mut doc = new_document(1);
    doc.insert_image(&create_test_png(20, 10), 1, 40.0, 20.0, 100.0, 50.0)
        .expect("Failed to insert PNG image");
    doc.insert_image(&create_test_jpeg(), 1, 200.0, 20.0, 50.0, 50.0)
        .expect("Failed to insert JPEG image");

    let bytes = doc.to_bytes().unwrap();
    let pdf = Document::load_mem(&bytes).unwrap();

    let resources = page_resources(&pdf, 1);
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    assert_eq!(xobjects.len(), 2);
    assert!(page_content(&pdf, 1).contains("/Im1 Do"));
    assert!(page_content(&pdf, 1).contains("/Im2 Do"));
}

#[test]
fn test_image_deduplication_across_pages() {
    let logo = create_test_png(30, 10);
    let mut doc = new_document(2);
    doc.insert_image(&logo, 1, 40.0, 20.0, 90.0, 30.0).unwrap();
    doc.insert_image(&logo, 2, 40.0, 20.0, 90.0, 30.0).unwrap();

    let bytes = doc.to_bytes().unwrap();
    let pdf = Document::load_mem(&bytes).unwrap();

    let image_ref = |page| {
        page_resources(&pdf, page)
            .get(b"XObject")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"Im1")
            .unwrap()
            .as_reference()
            .unwrap()
    };
    assert_eq!(image_ref(1), image_ref(2));
}

#[test]
fn test_image_box_measured_from_top() {
    let mut doc = new_document(1);
    doc.insert_image(&create_test_png(40, 10), 1, 40.0, 20.0, 120.0, 30.0)
        .unwrap();

    let bytes = doc.to_bytes().unwrap();
    let pdf = Document::load_mem(&bytes).unwrap();
    // Bottom edge at 842 - 20 - 30
    assert!(page_content(&pdf, 1).contains("120 0 0 30 40 792 cm"));
}

#[test]
fn test_invalid_image_data() {
    let mut doc = new_document(1);
    let err = doc
        .insert_image(b"definitely not an image", 1, 0.0, 0.0, 10.0, 10.0)
        .unwrap_err();
    assert!(matches!(err, PdfError::ImageError(_)));
}

#[test]
fn test_invalid_page_number() {
    let mut doc = new_document(1);
    match doc.insert_text("Hello", 5, 100.0, 700.0, Align::Left) {
        Err(PdfError::InvalidPage(5, 1)) => {}
        other => panic!("Expected InvalidPage error, got {other:?}"),
    }
}

#[test]
fn test_no_font_set() {
    let mut doc = PdfDocument::new(PageSize::A4);
    doc.add_page().unwrap();
    assert!(matches!(
        doc.insert_text("Hello", 1, 100.0, 700.0, Align::Left),
        Err(PdfError::FontNotFound(_))
    ));
}

#[test]
fn test_output_is_deterministic() {
    let build = || {
        let mut doc = new_document(2);
        doc.insert_text("Purchase Order", 1, 297.5, 60.0, Align::Center).unwrap();
        doc.set_font_weight(FontWeight::Bold).unwrap();
        doc.insert_text("Total", 2, 555.0, 300.0, Align::Right).unwrap();
        doc.draw_rect(2, 40.0, 100.0, 515.0, 40.0, 0.5).unwrap();
        doc.insert_image(&create_test_png(4, 4), 1, 40.0, 20.0, 20.0, 20.0).unwrap();
        doc.to_bytes().unwrap()
    };

    assert_eq!(build(), build());
}

#[test]
fn test_to_bytes_twice() {
    let mut doc = new_document(1);
    doc.insert_text("Again", 1, 40.0, 60.0, Align::Left).unwrap();
    let first = doc.to_bytes().unwrap();
    let second = doc.to_bytes().unwrap();
    assert_eq!(first, second);
}
