//! Deterministic slide layout.
//!
//! Line wrapping and vertical metrics are computed from a fixed advance
//! model (fullwidth characters one em, everything else roughly half an
//! em), so measurement is identical on every platform and needs no
//! rendering engine. The overflow fitter consumes [`SlideMeasure`]; the
//! SVG synthesizer consumes the placed lines.

use crate::fit::{Measure, Scale};
use crate::render::blocks::{Block, Span, SpanStyle};

/// Card geometry in CSS pixels at 1x. Exports rasterize at a 2x pixel ratio.
pub const CARD_WIDTH: f32 = 390.0;
pub const CARD_HEIGHT: f32 = 520.0;
pub const PADDING: f32 = 28.0;
pub const FOOTER_HEIGHT: f32 = 34.0;

/// Fixed visible height available to slide content.
pub const CONTENT_HEIGHT: f32 = CARD_HEIGHT - PADDING * 2.0 - FOOTER_HEIGHT;
pub const CONTENT_WIDTH: f32 = CARD_WIDTH - PADDING * 2.0;

/// Height reserved for an embedded image, including margins.
const IMAGE_HEIGHT: f32 = 150.0;
const IMAGE_MARGIN: f32 = 8.0;

const BLOCK_GAP: f32 = 12.0;
const LIST_INDENT: f32 = 18.0;
const QUOTE_INDENT: f32 = 16.0;
const CODE_PAD: f32 = 10.0;

/// What a placed line is, for styling at the SVG stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(u8),
    Body,
    ListItem,
    Quote,
    Code,
}

/// One horizontal line of styled text with its vertical slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Top of the line box, relative to the content origin.
    pub y: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub indent: f32,
    pub width: f32,
    pub kind: LineKind,
    pub spans: Vec<Span>,
}

/// A placed element: a text line or an image slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Line(PlacedLine),
    Image {
        y: f32,
        height: f32,
        src: String,
        alt: String,
    },
}

/// The layout of one slide at a specific scale.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutSlide {
    pub elements: Vec<Element>,
    /// Total content height; compared against [`CONTENT_HEIGHT`] by the fitter.
    pub content_height: f32,
    pub scale: Scale,
    pub cover: bool,
}

/// Scaled font metrics for one layout pass.
struct Metrics {
    h1: f32,
    h2: f32,
    h3: f32,
    body: f32,
    code: f32,
}

impl Metrics {
    fn at(scale: Scale, cover: bool) -> Self {
        let f = scale.factor();
        Self {
            h1: (if cover { 32.0 } else { 26.0 }) * f,
            h2: 19.0 * f,
            h3: 16.5 * f,
            body: 15.0 * f,
            code: 12.5 * f,
        }
    }

    fn heading_size(&self, level: u8) -> f32 {
        match level {
            1 => self.h1,
            2 => self.h2,
            _ => self.h3,
        }
    }
}

/// Advance width of one character in em units.
///
/// Fullwidth scripts (CJK ideographs, kana, hangul, fullwidth forms) get a
/// full em; everything else gets the average proportional advance. This is
/// an approximation, but a deterministic one — it only has to agree with
/// itself, because the same model drives both fitting and placement.
fn char_advance_em(c: char) -> f32 {
    let cp = c as u32;
    let fullwidth = matches!(cp,
        0x1100..=0x115F          // hangul jamo
        | 0x2E80..=0x303E        // CJK radicals, punctuation
        | 0x3041..=0x33FF        // kana, compatibility
        | 0x3400..=0x4DBF        // CJK ext A
        | 0x4E00..=0x9FFF        // CJK unified
        | 0xA000..=0xA4CF        // yi
        | 0xAC00..=0xD7A3        // hangul syllables
        | 0xF900..=0xFAFF        // CJK compatibility ideographs
        | 0xFE30..=0xFE4F        // vertical forms
        | 0xFF00..=0xFF60        // fullwidth forms
        | 0x20000..=0x2FFFD);
    if fullwidth { 1.0 } else { 0.52 }
}

/// Width of a string at a font size under the advance model.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_advance_em).sum::<f32>() * font_size
}

/// A wrappable unit: a whole halfwidth word, a single fullwidth character,
/// or an inter-word space.
struct Token {
    text: String,
    style: SpanStyle,
    width: f32,
    is_space: bool,
}

fn tokenize(spans: &[Span], font_size: f32) -> Vec<Token> {
    let mut tokens = Vec::new();
    for span in spans {
        let mut word = String::new();
        for c in span.text.chars() {
            if c.is_whitespace() {
                flush_word(&mut tokens, &mut word, span.style, font_size);
                tokens.push(Token {
                    text: " ".to_string(),
                    style: span.style,
                    width: char_advance_em(' ') * font_size,
                    is_space: true,
                });
            } else if char_advance_em(c) >= 1.0 {
                flush_word(&mut tokens, &mut word, span.style, font_size);
                tokens.push(Token {
                    text: c.to_string(),
                    style: span.style,
                    width: font_size,
                    is_space: false,
                });
            } else {
                word.push(c);
            }
        }
        flush_word(&mut tokens, &mut word, span.style, font_size);
    }
    tokens
}

fn flush_word(tokens: &mut Vec<Token>, word: &mut String, style: SpanStyle, font_size: f32) {
    if word.is_empty() {
        return;
    }
    let width = text_width(word, font_size);
    tokens.push(Token {
        text: std::mem::take(word),
        style,
        width,
        is_space: false,
    });
}

/// Greedy-fill wrap of styled spans into lines no wider than `max_width`.
///
/// A single token wider than the line is hard-broken per character rather
/// than allowed to overflow horizontally.
fn wrap(spans: &[Span], font_size: f32, max_width: f32) -> Vec<(Vec<Span>, f32)> {
    let mut lines: Vec<(Vec<Span>, f32)> = Vec::new();
    let mut line: Vec<Span> = Vec::new();
    let mut width = 0.0_f32;

    let mut flush = |line: &mut Vec<Span>, width: &mut f32, lines: &mut Vec<(Vec<Span>, f32)>| {
        if !line.is_empty() {
            lines.push((std::mem::take(line), *width));
        }
        *width = 0.0;
    };

    for token in tokenize(spans, font_size) {
        if token.is_space && line.is_empty() {
            continue;
        }
        if width + token.width > max_width && !line.is_empty() && !token.is_space {
            flush(&mut line, &mut width, &mut lines);
        }
        if token.width > max_width {
            // Hard-break an oversized token character by character.
            for c in token.text.chars() {
                let w = char_advance_em(c) * font_size;
                if width + w > max_width && !line.is_empty() {
                    flush(&mut line, &mut width, &mut lines);
                }
                push_text(&mut line, &c.to_string(), token.style);
                width += w;
            }
            continue;
        }
        push_text(&mut line, &token.text, token.style);
        width += token.width;
    }
    flush(&mut line, &mut width, &mut lines);

    // Trailing spaces don't count toward measured width.
    for (spans, width) in &mut lines {
        if let Some(last) = spans.last_mut() {
            let trimmed = last.text.trim_end();
            if trimmed.len() != last.text.len() {
                *width -= text_width(&last.text[trimmed.len()..], font_size);
                last.text.truncate(trimmed.len());
                if last.text.is_empty() {
                    spans.pop();
                }
            }
        }
    }
    lines
}

fn push_text(line: &mut Vec<Span>, text: &str, style: SpanStyle) {
    if let Some(last) = line.last_mut() {
        if last.style == style {
            last.text.push_str(text);
            return;
        }
    }
    line.push(Span::new(text, style));
}

/// Lay out a slide's blocks at the given scale.
pub fn layout(blocks: &[Block], cover: bool, scale: Scale) -> LaidOutSlide {
    let m = Metrics::at(scale, cover);
    let f = scale.factor();
    let mut elements = Vec::new();
    let mut y = 0.0_f32;

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            y += BLOCK_GAP * f;
        }
        match block {
            Block::Heading { level, spans } => {
                let size = m.heading_size(*level);
                place_lines(
                    &mut elements,
                    &mut y,
                    spans,
                    size,
                    size * 1.3,
                    0.0,
                    CONTENT_WIDTH,
                    LineKind::Heading(*level),
                );
            }
            Block::Paragraph(spans) => {
                place_lines(
                    &mut elements,
                    &mut y,
                    spans,
                    m.body,
                    m.body * 1.6,
                    0.0,
                    CONTENT_WIDTH,
                    LineKind::Body,
                );
            }
            Block::List { ordered, items } => {
                for (n, item) in items.iter().enumerate() {
                    let marker = if *ordered {
                        format!("{}. ", n + 1)
                    } else {
                        "\u{2022} ".to_string()
                    };
                    let mut spans = Vec::with_capacity(item.len() + 1);
                    spans.push(Span::plain(marker));
                    spans.extend(item.iter().cloned());
                    place_lines(
                        &mut elements,
                        &mut y,
                        &spans,
                        m.body,
                        m.body * 1.6,
                        LIST_INDENT * f,
                        CONTENT_WIDTH - LIST_INDENT * f,
                        LineKind::ListItem,
                    );
                }
            }
            Block::Quote(spans) => {
                place_lines(
                    &mut elements,
                    &mut y,
                    spans,
                    m.body,
                    m.body * 1.7,
                    QUOTE_INDENT * f,
                    CONTENT_WIDTH - QUOTE_INDENT * f,
                    LineKind::Quote,
                );
            }
            Block::Code(text) => {
                y += CODE_PAD * f;
                for raw_line in text.lines() {
                    let spans = [Span::new(raw_line, SpanStyle::Code)];
                    let lines = wrap(&spans, m.code, CONTENT_WIDTH - CODE_PAD * 2.0 * f);
                    if lines.is_empty() {
                        // Blank line inside a code block keeps its slot.
                        y += m.code * 1.5;
                    }
                    for (spans, width) in lines {
                        elements.push(Element::Line(PlacedLine {
                            y,
                            font_size: m.code,
                            line_height: m.code * 1.5,
                            indent: CODE_PAD * f,
                            width,
                            kind: LineKind::Code,
                            spans,
                        }));
                        y += m.code * 1.5;
                    }
                }
                y += CODE_PAD * f;
            }
            Block::Image { src, alt } => {
                y += IMAGE_MARGIN * f;
                let height = IMAGE_HEIGHT * f;
                elements.push(Element::Image {
                    y,
                    height,
                    src: src.clone(),
                    alt: alt.clone(),
                });
                y += height + IMAGE_MARGIN * f;
            }
        }
    }

    LaidOutSlide {
        elements,
        content_height: y,
        scale,
        cover,
    }
}

#[allow(clippy::too_many_arguments)]
fn place_lines(
    elements: &mut Vec<Element>,
    y: &mut f32,
    spans: &[Span],
    font_size: f32,
    line_height: f32,
    indent: f32,
    max_width: f32,
    kind: LineKind,
) {
    for (spans, width) in wrap(spans, font_size, max_width) {
        elements.push(Element::Line(PlacedLine {
            y: *y,
            font_size,
            line_height,
            indent,
            width,
            kind,
            spans,
        }));
        *y += line_height;
    }
}

/// Adapter feeding slide layout into the overflow fitter.
pub struct SlideMeasure<'a> {
    blocks: &'a [Block],
    cover: bool,
}

impl<'a> SlideMeasure<'a> {
    pub fn new(blocks: &'a [Block], cover: bool) -> Self {
        Self { blocks, cover }
    }
}

impl Measure for SlideMeasure<'_> {
    fn content_height(&self, scale: Scale) -> f32 {
        layout(self.blocks, self.cover, scale).content_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::blocks::parse_blocks;

    #[test]
    fn short_text_stays_on_one_line() {
        let blocks = parse_blocks("hello world");
        let laid = layout(&blocks, false, Scale::MAX);
        let lines: Vec<_> = laid
            .elements
            .iter()
            .filter(|e| matches!(e, Element::Line(_)))
            .collect();
        assert_eq!(lines.len(), 1);
        assert!((laid.content_height - 15.0 * 1.6).abs() < 0.01);
    }

    #[test]
    fn long_text_wraps() {
        let blocks = parse_blocks(&"word ".repeat(60));
        let laid = layout(&blocks, false, Scale::MAX);
        assert!(laid.elements.len() > 1);
    }

    #[test]
    fn cjk_breaks_anywhere() {
        // 50 fullwidth chars at 15px = 750px, needs at least 3 lines at 334px.
        let text = "\u{5361}".repeat(50);
        let blocks = parse_blocks(&text);
        let laid = layout(&blocks, false, Scale::MAX);
        assert!(laid.elements.len() >= 3);
    }

    #[test]
    fn smaller_scale_is_never_taller() {
        let blocks = parse_blocks(STARTER_SLIDE);
        let big = layout(&blocks, false, Scale::MAX).content_height;
        let small = SlideMeasure::new(&blocks, false).content_height(Scale::MIN);
        assert!(small <= big);
    }

    #[test]
    fn list_markers_are_materialized() {
        let blocks = parse_blocks("- apples\n- pears");
        let laid = layout(&blocks, false, Scale::MAX);
        match &laid.elements[0] {
            Element::Line(line) => {
                assert_eq!(line.kind, LineKind::ListItem);
                assert!(line.spans[0].text.starts_with('\u{2022}'));
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn cover_headings_are_larger() {
        let blocks = parse_blocks("# Title");
        let heading_size = |laid: &LaidOutSlide| match &laid.elements[0] {
            Element::Line(line) => line.font_size,
            other => panic!("expected line, got {other:?}"),
        };
        let cover = layout(&blocks, true, Scale::MAX);
        let inner = layout(&blocks, false, Scale::MAX);
        assert_eq!(heading_size(&cover), 32.0);
        assert_eq!(heading_size(&inner), 26.0);
        assert!(cover.content_height > inner.content_height);
    }

    #[test]
    fn empty_slide_has_zero_height() {
        let laid = layout(&[], false, Scale::MAX);
        assert_eq!(laid.content_height, 0.0);
        assert!(laid.elements.is_empty());
    }

    const STARTER_SLIDE: &str = "## 1. Split into pages\n\nNobody reads a wall of text.\n\n- **Cover**: big title\n- **Body**: one point per card";
}
