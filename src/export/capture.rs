//! The production capture backend: SVG → PNG via resvg.

use resvg::{tiny_skia, usvg};

use super::{Capture, PIXEL_RATIO};
use crate::error::{Error, Result};
use crate::render::ComposedSlide;

/// Rasterizes composed slides at a fixed 2x pixel ratio.
///
/// System fonts are loaded once at construction; text in the SVG resolves
/// against them at render time, so capture itself needs no further I/O —
/// images were already embedded as data URIs during composition.
pub struct RasterCapturer {
    options: usvg::Options<'static>,
    pixel_ratio: f32,
}

impl RasterCapturer {
    pub fn new() -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        Self {
            options,
            pixel_ratio: PIXEL_RATIO,
        }
    }

    /// Override the pixel-density multiplier (tests use 1x for speed).
    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }
}

impl Default for RasterCapturer {
    fn default() -> Self {
        Self::new()
    }
}

impl Capture for RasterCapturer {
    fn capture(&mut self, slide: &ComposedSlide) -> Result<Vec<u8>> {
        let tree = usvg::Tree::from_str(&slide.svg, &self.options)
            .map_err(|e| Error::Svg(e.to_string()))?;

        let size = tree.size();
        let width = (size.width() * self.pixel_ratio).round() as u32;
        let height = (size.height() * self.pixel_ratio).round() as u32;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| Error::Capture("zero-sized capture surface".to_string()))?;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(self.pixel_ratio, self.pixel_ratio),
            &mut pixmap.as_mut(),
        );

        pixmap.encode_png().map_err(|e| Error::Capture(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::export::Pipeline;
    use crate::model::Document;

    #[test]
    fn captures_a_real_png() {
        let doc = Document::new("# Hello\n\nA real capture.");
        let deck = Deck::from_markdown(doc.markdown());
        let pipeline = Pipeline::for_document(&doc);
        let mut capturer = RasterCapturer::new().with_pixel_ratio(1.0);

        let png = pipeline.export_slide(&mut capturer, &deck, 0).unwrap();
        // PNG signature.
        assert_eq!(&png[..8], &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn pixel_ratio_scales_the_surface() {
        let doc = Document::new("hi");
        let deck = Deck::from_markdown(doc.markdown());
        let pipeline = Pipeline::for_document(&doc);

        let one = pipeline
            .export_slide(&mut RasterCapturer::new().with_pixel_ratio(1.0), &deck, 0)
            .unwrap();
        let two = pipeline
            .export_slide(&mut RasterCapturer::new().with_pixel_ratio(2.0), &deck, 0)
            .unwrap();
        // Width is stored big-endian at offset 16 of the IHDR chunk.
        let w = |png: &[u8]| u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        assert_eq!(w(&two), w(&one) * 2);
    }
}
