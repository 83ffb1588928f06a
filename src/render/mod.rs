//! Per-slide rendering: Markdown → block IR → laid-out lines → SVG.
//!
//! The pipeline is pure until asset embedding:
//!
//! - [`blocks`]: pulldown-cmark events folded into a small block IR
//! - [`layout`]: deterministic line wrapping and vertical metrics, the
//!   measurement source for the overflow fitter
//! - [`svg`]: block layout + theme → a self-contained SVG document
//! - [`assets`]: local image references embedded as base64 data URIs
//!
//! The capture backend ([`crate::export`]) rasterizes the SVG to PNG.

pub mod assets;
pub mod blocks;
pub mod layout;
pub mod svg;

use std::path::Path;

use crate::error::Result;
use crate::fit::{Scale, fit};
use crate::model::{FontOption, Theme};

pub use blocks::{Block, Span, SpanStyle, parse_blocks};
pub use layout::{CARD_HEIGHT, CARD_WIDTH, CONTENT_HEIGHT, LaidOutSlide, SlideMeasure};

/// A slide rendered to SVG together with its fitting outcome.
#[derive(Debug, Clone)]
pub struct ComposedSlide {
    /// Zero-based slide position; 0 is the cover.
    pub index: usize,
    pub svg: String,
    /// Fitted font scale (a multiple of 5 in 40..=100).
    pub scale: Scale,
    /// Content still exceeds the card at the floor scale.
    pub overflowing: bool,
}

/// Render one slide: parse, fit against the card height, lay out at the
/// fitted scale, and synthesize SVG.
///
/// Fitting restarts from 100% on every call; a slide edit can therefore
/// both shrink and restore the scale.
pub fn compose_slide(
    text: &str,
    index: usize,
    total: usize,
    theme: &Theme,
    font: &FontOption,
    base_dir: Option<&Path>,
) -> Result<ComposedSlide> {
    let blocks = parse_blocks(text);
    let cover = index == 0;

    let measure = SlideMeasure::new(&blocks, cover);
    let fitted = fit(&measure, CONTENT_HEIGHT);

    let laid = layout::layout(&blocks, cover, fitted.scale);
    let svg = svg::render_svg(
        &laid,
        theme,
        font,
        index,
        total,
        fitted.overflowing,
        base_dir,
    )?;

    Ok(ComposedSlide {
        index,
        svg,
        scale: fitted.scale,
        overflowing: fitted.overflowing,
    })
}
