//! SVG synthesis: one laid-out slide → a self-contained SVG document.
//!
//! The document carries everything the rasterizer needs: background,
//! theme decoration, positioned text, embedded images, the page footer,
//! and the overflow badge. No external stylesheet or font reference is
//! emitted — external fetches are exactly what makes captures fail.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::model::{ContentAlign, Decor, FontOption, Theme};
use crate::render::assets::resolve_image;
use crate::render::blocks::SpanStyle;
use crate::render::layout::{
    CARD_HEIGHT, CARD_WIDTH, CONTENT_HEIGHT, CONTENT_WIDTH, Element, FOOTER_HEIGHT, LaidOutSlide,
    LineKind, PADDING, PlacedLine,
};

/// Escape text for inclusion in SVG/XML content or attributes.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a slide to an SVG document string.
#[allow(clippy::too_many_arguments)]
pub fn render_svg(
    laid: &LaidOutSlide,
    theme: &Theme,
    font: &FontOption,
    index: usize,
    total: usize,
    overflowing: bool,
    base_dir: Option<&Path>,
) -> Result<String> {
    let mut svg = String::with_capacity(4096);
    write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CARD_WIDTH}\" height=\"{CARD_HEIGHT}\" \
         viewBox=\"0 0 {CARD_WIDTH} {CARD_HEIGHT}\">"
    )
    .unwrap();

    background(&mut svg, theme);
    decor(&mut svg, theme);

    // Center content vertically on the cover and center-aligned themes,
    // as long as it fits; overflowing content pins to the top so the
    // beginning is always visible.
    let centered = laid.cover || theme.content_align == ContentAlign::Center;
    let top = if centered && laid.content_height < CONTENT_HEIGHT {
        PADDING + (CONTENT_HEIGHT - laid.content_height) / 2.0
    } else {
        PADDING
    };

    for element in &laid.elements {
        match element {
            Element::Line(line) => {
                if line.kind == LineKind::Code {
                    code_slab(&mut svg, theme, top, line);
                }
                if line.kind == LineKind::Quote {
                    quote_rule(&mut svg, theme, top, line);
                }
                text_line(&mut svg, theme, font, laid.cover, top, line);
            }
            Element::Image { y, height, src, alt } => {
                let href = resolve_image(src, base_dir)?;
                let w = CONTENT_WIDTH;
                write!(
                    svg,
                    "<image x=\"{PADDING}\" y=\"{:.2}\" width=\"{w}\" height=\"{height:.2}\" \
                     preserveAspectRatio=\"xMidYMid meet\" href=\"{}\">\
                     <title>{}</title></image>",
                    top + y,
                    escape_xml(&href),
                    escape_xml(alt),
                )
                .unwrap();
            }
        }
    }

    footer(&mut svg, theme, index, total);
    if overflowing {
        overflow_badge(&mut svg);
    }

    svg.push_str("</svg>");
    Ok(svg)
}

fn background(svg: &mut String, theme: &Theme) {
    match theme.background_end {
        Some(end) => {
            write!(
                svg,
                "<defs><linearGradient id=\"bg\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\">\
                 <stop offset=\"0\" stop-color=\"{}\"/><stop offset=\"1\" stop-color=\"{}\"/>\
                 </linearGradient></defs>\
                 <rect width=\"{CARD_WIDTH}\" height=\"{CARD_HEIGHT}\" fill=\"url(#bg)\"/>",
                theme.background, end
            )
            .unwrap();
        }
        None => {
            write!(
                svg,
                "<rect width=\"{CARD_WIDTH}\" height=\"{CARD_HEIGHT}\" fill=\"{}\"/>",
                theme.background
            )
            .unwrap();
        }
    }
}

fn decor(svg: &mut String, theme: &Theme) {
    match theme.decor {
        Decor::None => {}
        Decor::MarginRule => {
            // Ruled-notebook margin line down the left edge.
            write!(
                svg,
                "<line x1=\"34\" y1=\"0\" x2=\"34\" y2=\"{CARD_HEIGHT}\" \
                 stroke=\"#fca5a5\" stroke-opacity=\"0.5\"/>"
            )
            .unwrap();
        }
        Decor::StickyTab => {
            write!(
                svg,
                "<rect x=\"{}\" y=\"16\" width=\"48\" height=\"16\" fill=\"{}\" \
                 fill-opacity=\"0.8\" transform=\"rotate(-5 {} 24)\"/>",
                CARD_WIDTH - 72.0,
                theme.accent_color,
                CARD_WIDTH - 48.0,
            )
            .unwrap();
        }
        Decor::WashBand => {
            write!(
                svg,
                "<rect width=\"{CARD_WIDTH}\" height=\"8\" fill=\"{}\" fill-opacity=\"0.35\"/>",
                theme.accent_color
            )
            .unwrap();
        }
        Decor::TopBar => {
            write!(
                svg,
                "<rect width=\"{CARD_WIDTH}\" height=\"12\" fill=\"{}\"/>",
                theme.accent_color
            )
            .unwrap();
        }
    }
}

fn code_slab(svg: &mut String, theme: &Theme, top: f32, line: &PlacedLine) {
    let slab = if theme.is_dark { "#020617" } else { "#1e293b" };
    write!(
        svg,
        "<rect x=\"{PADDING}\" y=\"{:.2}\" width=\"{CONTENT_WIDTH}\" height=\"{:.2}\" fill=\"{slab}\"/>",
        top + line.y,
        line.line_height + 0.5,
    )
    .unwrap();
}

fn quote_rule(svg: &mut String, theme: &Theme, top: f32, line: &PlacedLine) {
    write!(
        svg,
        "<rect x=\"{PADDING}\" y=\"{:.2}\" width=\"3\" height=\"{:.2}\" \
         fill=\"{}\" fill-opacity=\"0.6\"/>",
        top + line.y,
        line.line_height,
        theme.accent_color,
    )
    .unwrap();
}

fn text_line(
    svg: &mut String,
    theme: &Theme,
    font: &FontOption,
    cover: bool,
    top: f32,
    line: &PlacedLine,
) {
    let baseline = top + line.y + line.line_height / 2.0 + line.font_size * 0.35;
    let (x, anchor) = if cover && line.kind != LineKind::Code {
        (CARD_WIDTH / 2.0, " text-anchor=\"middle\"")
    } else {
        (PADDING + line.indent, "")
    };

    let (fill, weight, style) = match line.kind {
        LineKind::Heading(_) => (theme.heading_color, " font-weight=\"bold\"", ""),
        LineKind::Quote => (theme.body_color, "", " font-style=\"italic\""),
        LineKind::Code => ("#e2e8f0", "", ""),
        LineKind::Body | LineKind::ListItem => (theme.body_color, "", ""),
    };
    let family = if line.kind == LineKind::Code {
        "JetBrains Mono, monospace"
    } else {
        font.family
    };

    write!(
        svg,
        "<text x=\"{x:.2}\" y=\"{baseline:.2}\" font-family=\"{}\" font-size=\"{:.2}\" \
         fill=\"{fill}\"{weight}{style}{anchor}>",
        escape_xml(family),
        line.font_size,
    )
    .unwrap();

    for span in &line.spans {
        match span.style {
            SpanStyle::Plain => {
                write!(svg, "{}", escape_xml(&span.text)).unwrap();
            }
            SpanStyle::Strong => {
                write!(
                    svg,
                    "<tspan font-weight=\"bold\" fill=\"{}\">{}</tspan>",
                    theme.heading_color,
                    escape_xml(&span.text)
                )
                .unwrap();
            }
            SpanStyle::Emph => {
                write!(
                    svg,
                    "<tspan font-style=\"italic\">{}</tspan>",
                    escape_xml(&span.text)
                )
                .unwrap();
            }
            SpanStyle::Code => {
                write!(
                    svg,
                    "<tspan font-family=\"JetBrains Mono, monospace\" font-size=\"{:.2}\" \
                     fill=\"{}\">{}</tspan>",
                    line.font_size * 0.88,
                    theme.heading_color,
                    escape_xml(&span.text)
                )
                .unwrap();
            }
        }
    }
    svg.push_str("</text>");
}

fn footer(svg: &mut String, theme: &Theme, index: usize, total: usize) {
    let (line_color, text_color) = if theme.is_dark {
        ("#ffffff33", "#ffffff66")
    } else {
        ("#0000000d", "#0000004d")
    };
    let y = CARD_HEIGHT - FOOTER_HEIGHT;
    write!(
        svg,
        "<line x1=\"{PADDING}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"{line_color}\"/>",
        CARD_WIDTH - PADDING
    )
    .unwrap();

    let ty = y + 18.0;
    let handle = format!("@{}", theme.name).to_uppercase();
    write!(
        svg,
        "<text x=\"{PADDING}\" y=\"{ty}\" font-family=\"sans-serif\" font-size=\"8\" \
         letter-spacing=\"1\" fill=\"{text_color}\">{}</text>",
        escape_xml(&handle)
    )
    .unwrap();
    write!(
        svg,
        "<text x=\"{}\" y=\"{ty}\" font-family=\"sans-serif\" font-size=\"8\" \
         letter-spacing=\"1\" fill=\"{text_color}\" text-anchor=\"end\">{} / {}</text>",
        CARD_WIDTH - PADDING,
        index + 1,
        total
    )
    .unwrap();
}

fn overflow_badge(svg: &mut String) {
    let y = CARD_HEIGHT - FOOTER_HEIGHT - 18.0;
    let x = CARD_WIDTH / 2.0;
    write!(
        svg,
        "<rect x=\"{:.2}\" y=\"{y}\" width=\"64\" height=\"13\" rx=\"6.5\" \
         fill=\"#ffffff\" fill-opacity=\"0.85\"/>\
         <text x=\"{x}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"7\" font-weight=\"bold\" \
         letter-spacing=\"1\" fill=\"#ef4444\" text-anchor=\"middle\">OVERFLOW</text>",
        x - 32.0,
        y + 9.5,
    )
    .unwrap();
}
