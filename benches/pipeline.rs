//! Benchmarks for the card rendering pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use cardeck::deck::{Deck, split_slides};
use cardeck::fit::fit;
use cardeck::model::{STARTER_MARKDOWN, font_by_id, theme_by_id};
use cardeck::render::{CONTENT_HEIGHT, SlideMeasure, compose_slide, parse_blocks};
use cardeck::{Capture, Document, Pipeline, RasterCapturer};

fn bench_split(c: &mut Criterion) {
    // A larger document: the starter template repeated.
    let doc = vec![STARTER_MARKDOWN; 16].join("\n\n---\n\n");

    c.bench_function("split_slides", |b| {
        b.iter(|| split_slides(&doc));
    });
}

fn bench_parse_and_fit(c: &mut Criterion) {
    let slides = split_slides(STARTER_MARKDOWN);
    let text = slides[1];

    c.bench_function("parse_and_fit", |b| {
        b.iter(|| {
            let blocks = parse_blocks(text);
            fit(&SlideMeasure::new(&blocks, false), CONTENT_HEIGHT)
        });
    });
}

fn bench_compose_slide(c: &mut Criterion) {
    let slides = split_slides(STARTER_MARKDOWN);
    let theme = theme_by_id("notebook");
    let font = font_by_id("sans");

    c.bench_function("compose_slide", |b| {
        b.iter(|| compose_slide(slides[1], 1, slides.len(), theme, font, None).unwrap());
    });
}

fn bench_capture_slide(c: &mut Criterion) {
    let doc = Document::default();
    let deck = Deck::from_markdown(doc.markdown());
    let pipeline = Pipeline::for_document(&doc);
    let composed = pipeline.compose(&deck, 0).unwrap();
    let mut capturer = RasterCapturer::new();

    c.bench_function("capture_slide", |b| {
        b.iter(|| capturer.capture(&composed).unwrap());
    });
}

criterion_group!(
    benches,
    bench_split,
    bench_parse_and_fit,
    bench_compose_slide,
    bench_capture_slide,
);
criterion_main!(benches);
