//! The document: a single mutable Markdown string plus presentation settings.

use crate::model::theme::{FONTS, THEMES};

/// The starter template seeded into a fresh session.
pub const STARTER_MARKDOWN: &str = "\
# Make your notes
# post like this!

How do you turn plain text into polished social cards?
A few simple steps and your content reads like a magazine.

---

## 1. Split into pages

Nobody reads a wall of text.
Use `---` lines to cut your content into cards.

- **Cover**: big title, grabs attention
- **Body**: one clear point per card
- **Ending**: invite interaction

---

## 2. Pick the right theme

Different content suits different styles:

1. **Notebook**: study notes, journal entries
2. **Grid paper**: tips, checklists
3. **Editorial**: essays, pull quotes

> \"Layout is the clothing of content.\"

---

## 3. Export in one click

No design software needed.
Write here, then copy or download each card straight to your feed.

**Try it now!**
";

/// A deck's source document.
///
/// The Markdown string is the single source of truth for content. All
/// mutation is whole-value replacement: slides are derived views that are
/// recomputed from scratch after every change, so a reader never observes
/// a partially-updated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    markdown: String,
    /// Project title, used for output file naming.
    pub title: String,
    /// Identifier of the active theme (falls back to the first built-in).
    pub theme_id: String,
    /// Identifier of the active font (falls back to the theme default).
    pub font_id: String,
}

impl Document {
    /// Create a document from Markdown source with default settings.
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            title: "cardeck".to_string(),
            theme_id: THEMES[0].id.to_string(),
            font_id: FONTS[0].id.to_string(),
        }
    }

    /// The full Markdown source.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// Replace the entire Markdown source.
    pub fn set_markdown(&mut self, markdown: impl Into<String>) {
        self.markdown = markdown.into();
    }

    /// Title with whitespace runs collapsed to `-`, for file and folder names.
    pub fn file_stem(&self) -> String {
        let mut stem = String::with_capacity(self.title.len());
        let mut in_gap = false;
        for c in self.title.trim().chars() {
            if c.is_whitespace() {
                in_gap = true;
            } else {
                if in_gap && !stem.is_empty() {
                    stem.push('-');
                }
                in_gap = false;
                stem.push(c);
            }
        }
        if stem.is_empty() { "deck".to_string() } else { stem }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(STARTER_MARKDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_collapses_whitespace() {
        let mut doc = Document::new("");
        doc.title = "My  Cool\tDeck".to_string();
        assert_eq!(doc.file_stem(), "My-Cool-Deck");
    }

    #[test]
    fn file_stem_never_empty() {
        let mut doc = Document::new("");
        doc.title = "   ".to_string();
        assert_eq!(doc.file_stem(), "deck");
    }

    #[test]
    fn set_markdown_replaces_whole_value() {
        let mut doc = Document::default();
        doc.set_markdown("# New");
        assert_eq!(doc.markdown(), "# New");
    }
}
