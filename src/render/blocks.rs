//! Markdown → block IR.
//!
//! Folds pulldown-cmark's event stream into the handful of block shapes a
//! card can show. Link targets are dropped (the text flows through),
//! images are lifted to block level, and horizontal rules are ignored —
//! delimiter rules never reach the renderer because the splitter consumes
//! them first.

use pulldown_cmark::{Event, Options, Parser, Tag};

/// Inline style of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Plain,
    Strong,
    Emph,
    Code,
}

/// A styled run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

impl Span {
    pub fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, SpanStyle::Plain)
    }
}

/// One block-level element of a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    List { ordered: bool, items: Vec<Vec<Span>> },
    Quote(Vec<Span>),
    Code(String),
    Image { src: String, alt: String },
}

/// Parse one slide's Markdown into blocks.
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut fold = Fold::default();
    for event in parser {
        fold.event(event);
    }
    fold.blocks
}

#[derive(Default)]
struct Fold {
    blocks: Vec<Block>,
    inline: Vec<Span>,
    strong: u32,
    emph: u32,
    quote_depth: u32,
    quote: Vec<Span>,
    code: Option<String>,
    lists: Vec<(bool, Vec<Vec<Span>>)>,
    items: Vec<Vec<Span>>,
    image: Option<(String, usize)>,
}

impl Fold {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(text) => self.push_span(&text, SpanStyle::Code),
            Event::SoftBreak | Event::HardBreak => self.text(" "),
            // Raw HTML, rules, footnotes and task markers have no card
            // representation.
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::BlockQuote => self.quote_depth += 1,
            // Language hints are accepted but not used for styling.
            Tag::CodeBlock(_) => self.code = Some(String::new()),
            Tag::List(start) => self.lists.push((start.is_some(), Vec::new())),
            Tag::Item => self.items.push(Vec::new()),
            Tag::Strong => self.strong += 1,
            Tag::Emphasis => self.emph += 1,
            Tag::Image(_, src, _) => {
                self.image = Some((src.into_string(), self.inline.len()));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading(level, _, _) => {
                let spans = std::mem::take(&mut self.inline);
                if !spans.is_empty() {
                    self.blocks.push(Block::Heading {
                        level: level as u8,
                        spans,
                    });
                }
            }
            Tag::Paragraph => {
                let spans = std::mem::take(&mut self.inline);
                if spans.is_empty() {
                    return;
                }
                if let Some(item) = self.items.last_mut() {
                    append_separated(item, spans);
                } else if self.quote_depth > 0 {
                    append_separated(&mut self.quote, spans);
                } else {
                    self.blocks.push(Block::Paragraph(spans));
                }
            }
            Tag::BlockQuote => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 {
                    let spans = std::mem::take(&mut self.quote);
                    if !spans.is_empty() {
                        self.blocks.push(Block::Quote(spans));
                    }
                }
            }
            Tag::CodeBlock(_) => {
                if let Some(text) = self.code.take() {
                    self.blocks.push(Block::Code(text.trim_end().to_string()));
                }
            }
            Tag::Item => {
                let mut item = self.items.pop().unwrap_or_default();
                append_separated(&mut item, std::mem::take(&mut self.inline));
                if let Some((_, items)) = self.lists.last_mut() {
                    items.push(item);
                }
            }
            Tag::List(_) => {
                if let Some((ordered, items)) = self.lists.pop() {
                    if let Some((_, outer)) = self.lists.last_mut() {
                        // Nested lists flatten into the parent.
                        outer.extend(items);
                    } else if !items.is_empty() {
                        self.blocks.push(Block::List { ordered, items });
                    }
                }
            }
            Tag::Strong => self.strong = self.strong.saturating_sub(1),
            Tag::Emphasis => self.emph = self.emph.saturating_sub(1),
            Tag::Image(_, _, _) => {
                if let Some((src, mark)) = self.image.take() {
                    let alt: String = self.inline[mark..]
                        .iter()
                        .map(|s| s.text.as_str())
                        .collect();
                    self.inline.truncate(mark);
                    self.blocks.push(Block::Image { src, alt });
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = self.code.as_mut() {
            code.push_str(text);
            return;
        }
        let style = if self.strong > 0 {
            SpanStyle::Strong
        } else if self.emph > 0 {
            SpanStyle::Emph
        } else {
            SpanStyle::Plain
        };
        self.push_span(text, style);
    }

    fn push_span(&mut self, text: &str, style: SpanStyle) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.inline.last_mut() {
            if last.style == style {
                last.text.push_str(text);
                return;
            }
        }
        self.inline.push(Span::new(text, style));
    }
}

/// Append spans to an accumulator, inserting a space between merged runs
/// (loose list items, multi-paragraph quotes).
fn append_separated(target: &mut Vec<Span>, spans: Vec<Span>) {
    if spans.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(Span::plain(" "));
    }
    target.extend(spans);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_and_paragraph() {
        let blocks = parse_blocks("# Title\n\nBody **bold** tail");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(&blocks[0], Block::Heading { level: 1, .. }));
        match &blocks[1] {
            Block::Paragraph(spans) => {
                assert_eq!(spans[0], Span::plain("Body "));
                assert_eq!(spans[1], Span::new("bold", SpanStyle::Strong));
                assert_eq!(spans[2], Span::plain(" tail"));
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn lists_keep_order_and_kind() {
        let blocks = parse_blocks("1. first\n2. second\n\n- a\n- b");
        match &blocks[0] {
            Block::List { ordered, items } => {
                assert!(*ordered);
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected ordered list, got {other:?}"),
        }
        assert!(matches!(&blocks[1], Block::List { ordered: false, .. }));
    }

    #[test]
    fn quote_merges_paragraphs() {
        let blocks = parse_blocks("> one\n>\n> two");
        match &blocks[0] {
            Block::Quote(spans) => {
                let text: String = spans.iter().map(|s| s.text.as_str()).collect();
                assert_eq!(text, "one two");
            }
            other => panic!("expected quote, got {other:?}"),
        }
    }

    #[test]
    fn images_are_lifted_to_blocks() {
        let blocks = parse_blocks("before ![a cat](cat.png) after");
        assert!(blocks.iter().any(|b| matches!(
            b,
            Block::Image { src, alt } if src == "cat.png" && alt == "a cat"
        )));
        // The surrounding text survives as a paragraph.
        assert!(blocks.iter().any(|b| matches!(b, Block::Paragraph(_))));
    }

    #[test]
    fn inline_code_is_a_styled_span() {
        let blocks = parse_blocks("use `---` to split");
        match &blocks[0] {
            Block::Paragraph(spans) => {
                assert!(spans.iter().any(|s| s.style == SpanStyle::Code));
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn code_block_text_is_verbatim() {
        let blocks = parse_blocks("```\nlet x = 1;\nlet y = 2;\n```");
        assert_eq!(blocks[0], Block::Code("let x = 1;\nlet y = 2;".into()));
    }
}
