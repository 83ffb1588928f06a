//! End-to-end export tests: Markdown document in, PNG files or a zip
//! archive out, through the real rasterizer.

use std::fs;
use std::io::Cursor;

use cardeck::deck::Deck;
use cardeck::render::{CARD_HEIGHT, CARD_WIDTH};
use cardeck::{Document, Pipeline, Progress, RasterCapturer};
use tempfile::TempDir;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

fn png_dimensions(png: &[u8]) -> (u32, u32) {
    // IHDR is always the first chunk: width and height at offsets 16 and 20.
    let width = u32::from_be_bytes(png[16..20].try_into().unwrap());
    let height = u32::from_be_bytes(png[20..24].try_into().unwrap());
    (width, height)
}

fn starter_document() -> Document {
    let mut doc = Document::default();
    doc.title = "Starter Deck".to_string();
    doc
}

#[test]
fn test_export_starter_deck_to_directory() {
    let doc = starter_document();
    let deck = Deck::from_markdown(doc.markdown());
    assert_eq!(deck.len(), 4, "starter template should have 4 pages");

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pipeline = Pipeline::for_document(&doc);
    let mut capturer = RasterCapturer::new();

    let outcome = pipeline
        .export_deck_to_dir(&mut capturer, &deck, temp_dir.path(), |_| {})
        .expect("Failed to export deck");

    assert_eq!(outcome.total, 4);
    assert!(outcome.skipped.is_empty(), "no slide should be skipped");

    for i in 1..=4 {
        let path = temp_dir
            .path()
            .join(format!("Starter-Deck-slide-{}.png", i));
        let png = fs::read(&path).expect("Failed to read exported PNG");
        assert_eq!(&png[..8], &PNG_SIGNATURE, "{} is not a PNG", path.display());

        // 2x pixel ratio doubles the card dimensions.
        let (w, h) = png_dimensions(&png);
        assert_eq!(w, (CARD_WIDTH * 2.0) as u32);
        assert_eq!(h, (CARD_HEIGHT * 2.0) as u32);
    }
}

#[test]
fn test_export_reports_progress_in_order() {
    let doc = starter_document();
    let deck = Deck::from_markdown(doc.markdown());
    let pipeline = Pipeline::for_document(&doc);
    let mut capturer = RasterCapturer::new();
    let mut seen: Vec<Progress> = Vec::new();

    pipeline.export_deck(&mut capturer, &deck, |p| seen.push(p));

    let completed: Vec<usize> = seen.iter().map(|p| p.completed).collect();
    assert_eq!(completed, vec![1, 2, 3, 4]);
    assert!(seen.iter().all(|p| p.total == 4));
}

#[test]
fn test_export_archive_roundtrip() {
    let doc = starter_document();
    let deck = Deck::from_markdown(doc.markdown());
    let pipeline = Pipeline::for_document(&doc);
    let mut capturer = RasterCapturer::new();

    let mut buf = Cursor::new(Vec::new());
    let outcome = pipeline
        .export_archive(&mut capturer, &deck, &mut buf, |_| {})
        .expect("Failed to write archive");
    assert_eq!(outcome.exported.len(), 4);

    let mut archive = zip::ZipArchive::new(buf).expect("Failed to read archive back");
    assert_eq!(archive.len(), 4);

    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    for (i, name) in names.iter().enumerate() {
        assert_eq!(
            name,
            &format!("Starter-Deck/Starter-Deck-slide-{}.png", i + 1),
            "archive entries live under the title folder"
        );
    }

    // Entries decompress back to PNG data.
    use std::io::Read;
    let mut first = Vec::new();
    archive
        .by_index(0)
        .unwrap()
        .read_to_end(&mut first)
        .expect("Failed to read entry");
    assert_eq!(&first[..8], &PNG_SIGNATURE);
}

#[test]
fn test_local_image_is_embedded() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    // Tiny valid 1x1 PNG.
    let pixel: &[u8] = &[
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1f, 0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9c, 0x62, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00,
        0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ];
    fs::write(temp_dir.path().join("pixel.png"), pixel).expect("Failed to write fixture");

    let doc = Document::new("# Cover\n\n---\n\n![a dot](pixel.png)\n\nCaption below.");
    let deck = Deck::from_markdown(doc.markdown());
    let pipeline = Pipeline::for_document(&doc).with_base_dir(temp_dir.path());

    let composed = pipeline.compose(&deck, 1).expect("Failed to compose slide");
    assert!(
        composed.svg.contains("data:image/png;base64,"),
        "local image should be embedded as a data URI"
    );
}

#[test]
fn test_remote_image_slide_is_skipped_not_fatal() {
    let doc = Document::new("fine\n\n---\n\n![remote](https://example.com/x.png)\n\n---\n\nalso fine");
    let deck = Deck::from_markdown(doc.markdown());
    let pipeline = Pipeline::for_document(&doc);
    let mut capturer = RasterCapturer::new();

    let outcome = pipeline.export_deck(&mut capturer, &deck, |_| {});
    assert_eq!(outcome.skipped, vec![1], "remote image slide is skipped");
    assert_eq!(outcome.exported.len(), 2, "surrounding slides still export");
}

#[test]
fn test_empty_deck_archive_is_an_error() {
    let doc = Document::new("   \n  ");
    let deck = Deck::from_markdown(doc.markdown());
    assert!(deck.is_empty());

    let pipeline = Pipeline::for_document(&doc);
    let mut buf = Cursor::new(Vec::new());
    let result = pipeline.export_archive(&mut RasterCapturer::new(), &deck, &mut buf, |_| {});
    assert!(result.is_err(), "archive of zero slides must not be produced");
}
