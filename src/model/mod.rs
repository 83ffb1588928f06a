//! Core data model for deck processing.
//!
//! This module contains:
//! - The document (single source of truth for Markdown content)
//! - Themes and font options applied uniformly across all slides

mod document;
mod theme;

pub use document::{Document, STARTER_MARKDOWN};
pub use theme::{ContentAlign, Decor, FONTS, FontOption, THEMES, Theme, font_by_id, theme_by_id};
