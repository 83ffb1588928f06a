//! WASM bindings for the browser build.
//!
//! Exposes the pure pipeline — splitting, fitting, and SVG composition —
//! to JavaScript. Rasterization stays on the JS side in the browser,
//! which already has a canvas; the native capture backend is not
//! compiled for wasm.

use wasm_bindgen::prelude::*;

use crate::deck::split_slides;
use crate::fit::fit;
use crate::model::{font_by_id, theme_by_id};
use crate::render::{CONTENT_HEIGHT, SlideMeasure, compose_slide, parse_blocks};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Split a document into slide texts.
#[wasm_bindgen]
pub fn split(markdown: &str) -> Vec<String> {
    split_slides(markdown).iter().map(|s| s.to_string()).collect()
}

/// Fitted font scale (percent) for one slide of the document.
#[wasm_bindgen]
pub fn slide_scale(markdown: &str, index: usize) -> Result<u8, JsValue> {
    let slides = split_slides(markdown);
    let text = slides
        .get(index)
        .ok_or_else(|| JsValue::from_str("slide index out of range"))?;
    let blocks = parse_blocks(text);
    let fitted = fit(&SlideMeasure::new(&blocks, index == 0), CONTENT_HEIGHT);
    Ok(fitted.scale.percent())
}

/// Render one slide of the document to a self-contained SVG string.
///
/// Image references must already be data URIs; the wasm build has no
/// filesystem to resolve paths against.
#[wasm_bindgen]
pub fn slide_svg(
    markdown: &str,
    index: usize,
    theme_id: &str,
    font_id: &str,
) -> Result<String, JsValue> {
    let slides = split_slides(markdown);
    let text = slides
        .get(index)
        .ok_or_else(|| JsValue::from_str("slide index out of range"))?;

    let composed = compose_slide(
        text,
        index,
        slides.len(),
        theme_by_id(theme_id),
        font_by_id(font_id),
        None,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(composed.svg)
}
