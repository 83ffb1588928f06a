//! Document-to-slide decomposition.
//!
//! A slide is a derived, non-owned view: a contiguous substring of the
//! document between two delimiter lines. Slides are recomputed from scratch
//! whenever the document changes; they are never independently mutated.
//!
//! The delimiter is a line consisting solely of three or more `-`
//! characters, matched as the pattern "newline, run of >= 3 hyphens,
//! newline". Splitting is pure and idempotent: identical input always
//! yields identical output.

use memchr::memchr_iter;

/// Canonical delimiter inserted between slides when joining them back into
/// a single document (the authored form surrounds the rule with blank lines).
pub const DELIMITER: &str = "\n\n---\n\n";

/// Split a document into ordered slide texts.
///
/// Each segment is trimmed of leading/trailing whitespace; segments that
/// are empty after trimming are dropped. A document with no delimiter
/// yields exactly one slide (the whole trimmed document); an empty or
/// whitespace-only document yields zero slides. The zero-slide case is a
/// valid state, not an error.
///
/// # Examples
///
/// ```
/// use cardeck::deck::split_slides;
///
/// let slides = split_slides("# Title\n\n---\n\nBody text here");
/// assert_eq!(slides, vec!["# Title", "Body text here"]);
/// ```
pub fn split_slides(markdown: &str) -> Vec<&str> {
    let bytes = markdown.as_bytes();
    let mut slides = Vec::new();
    let mut start = 0;

    let mut newlines = memchr_iter(b'\n', bytes);
    while let Some(nl) = newlines.next() {
        if nl < start {
            continue;
        }
        // Count the run of hyphens following this newline.
        let mut end = nl + 1;
        while end < bytes.len() && bytes[end] == b'-' {
            end += 1;
        }
        let hyphens = end - (nl + 1);
        if hyphens >= 3 && end < bytes.len() && bytes[end] == b'\n' {
            push_trimmed(&mut slides, &markdown[start..nl]);
            // Resume after the trailing newline; both newlines belong to
            // the delimiter, exactly like the pattern `\n-{3,}\n`.
            start = end + 1;
        }
    }

    push_trimmed(&mut slides, &markdown[start..]);
    slides
}

fn push_trimmed<'a>(slides: &mut Vec<&'a str>, segment: &'a str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        slides.push(trimmed);
    }
}

/// An ordered sequence of slides derived from one document.
///
/// The first slide (index 0) is the cover by position; there is no explicit
/// marker. An empty deck renders as an empty gallery with an "add a page"
/// affordance in the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck<'a> {
    slides: Vec<&'a str>,
}

impl<'a> Deck<'a> {
    /// Derive the deck from the full document source.
    pub fn from_markdown(markdown: &'a str) -> Self {
        Self {
            slides: split_slides(markdown),
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Slide texts in document order.
    pub fn slides(&self) -> &[&'a str] {
        &self.slides
    }

    /// The cover slide, if the deck has any slides at all.
    pub fn cover(&self) -> Option<&'a str> {
        self.slides.first().copied()
    }

    /// Iterate as `(index, text)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.slides.iter().copied().enumerate()
    }

    /// Rebuild a document that splits back into exactly these slides.
    pub fn join(&self) -> String {
        self.slides.join(DELIMITER)
    }
}
