//! # cardeck
//!
//! A library for turning Markdown documents into decks of social-media
//! card images.
//!
//! ## Features
//!
//! - Split Markdown into slides on `---` delimiter lines
//! - Fit each slide's content by stepping the font scale down from 100%
//! - Render slides to themed SVG and rasterize them to PNG
//! - Export a deck as individual PNG files or a single zip archive
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use cardeck::deck::Deck;
//! use cardeck::{Document, Pipeline, RasterCapturer};
//!
//! let doc = Document::new("# Hello\n\nfirst card\n\n---\n\nsecond card");
//! let deck = Deck::from_markdown(doc.markdown());
//! let pipeline = Pipeline::for_document(&doc);
//! let mut capturer = RasterCapturer::new();
//! let outcome = pipeline
//!     .export_deck_to_dir(&mut capturer, &deck, Path::new("out"), |_| {})
//!     .unwrap();
//! assert_eq!(outcome.total, 2);
//! ```
//!
//! ## Splitting and Fitting
//!
//! The splitter and fitter are pure and usable on their own:
//!
//! ```
//! use cardeck::deck::Deck;
//!
//! let deck = Deck::from_markdown("cover\n\n---\n\nbody");
//! assert_eq!(deck.len(), 2);
//! assert_eq!(deck.cover(), Some("cover"));
//! ```

pub mod deck;
pub mod error;
pub mod export;
pub mod fit;
pub mod model;
pub mod render;
pub mod store;

#[cfg(feature = "bridge")]
pub mod bridge;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use deck::{DELIMITER, Deck, split_slides};
pub use error::{Error, Result};
pub use export::{
    BatchOutcome, Capture, ExportControl, ExportStatus, ExportedSlide, PIXEL_RATIO, Pipeline,
    Progress, RasterCapturer,
};
pub use fit::{FitResult, Measure, Scale, fit};
pub use model::{Document, FONTS, FontOption, THEMES, Theme, font_by_id, theme_by_id};
pub use render::{ComposedSlide, compose_slide};
pub use store::{Session, Store};
