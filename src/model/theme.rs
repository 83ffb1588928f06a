//! Built-in themes and font options.
//!
//! A theme is an immutable bundle of visual parameters: colors, an accent
//! decoration, and a default typeface. Themes are orthogonal to slide
//! content; switching themes never touches the document.

/// Vertical alignment of slide content inside the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentAlign {
    /// Content starts at the top (after padding).
    Start,
    /// Content is centered vertically.
    Center,
}

/// Decorative accent drawn behind the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decor {
    None,
    /// Ruled-notebook margin line down the left edge.
    MarginRule,
    /// Small tilted sticky-tab in the top-right corner.
    StickyTab,
    /// Thin wash band across the top edge.
    WashBand,
    /// Heavy bar across the top edge (editorial masthead).
    TopBar,
}

/// An immutable visual configuration applied uniformly across all slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    /// Font applied when the session has no explicit font choice.
    pub default_font: &'static str,
    /// Card background. When `background_end` is set, a vertical gradient.
    pub background: &'static str,
    pub background_end: Option<&'static str>,
    pub heading_color: &'static str,
    pub body_color: &'static str,
    pub accent_color: &'static str,
    pub is_dark: bool,
    pub content_align: ContentAlign,
    pub decor: Decor,
}

/// A selectable typeface: identifier, display name, and font-family stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontOption {
    pub id: &'static str,
    pub name: &'static str,
    pub family: &'static str,
}

pub const FONTS: &[FontOption] = &[
    FontOption {
        id: "sans",
        name: "Source Sans",
        family: "Noto Sans, Source Han Sans, sans-serif",
    },
    FontOption {
        id: "serif",
        name: "Source Serif",
        family: "Noto Serif, Source Han Serif, serif",
    },
    FontOption {
        id: "rounded",
        name: "Rounded",
        family: "Varela Round, M PLUS Rounded 1c, sans-serif",
    },
    FontOption {
        id: "hand",
        name: "Handwriting",
        family: "Caveat, Ma Shan Zheng, cursive",
    },
    FontOption {
        id: "mincho",
        name: "Mincho",
        family: "Noto Serif JP, Shippori Mincho, serif",
    },
    FontOption {
        id: "modern",
        name: "Poppins",
        family: "Poppins, sans-serif",
    },
    FontOption {
        id: "elegant",
        name: "Playfair",
        family: "Playfair Display, serif",
    },
    FontOption {
        id: "mono",
        name: "Monospace",
        family: "JetBrains Mono, monospace",
    },
];

pub const THEMES: &[Theme] = &[
    Theme {
        id: "notebook",
        name: "Student Notebook",
        default_font: "hand",
        background: "#fdfbf7",
        background_end: None,
        heading_color: "#1e293b",
        body_color: "#334155",
        accent_color: "#fef08a",
        is_dark: false,
        content_align: ContentAlign::Start,
        decor: Decor::MarginRule,
    },
    Theme {
        id: "grid",
        name: "Grid Paper",
        default_font: "rounded",
        background: "#ffffff",
        background_end: None,
        heading_color: "#0f172a",
        body_color: "#475569",
        accent_color: "#fef9c3",
        is_dark: false,
        content_align: ContentAlign::Center,
        decor: Decor::StickyTab,
    },
    Theme {
        id: "latte",
        name: "Warm Latte",
        default_font: "serif",
        background: "#fffbeb",
        background_end: Some("#fff7ed"),
        heading_color: "#78350f",
        body_color: "#92400e",
        accent_color: "#fcd34d",
        is_dark: false,
        content_align: ContentAlign::Center,
        decor: Decor::WashBand,
    },
    Theme {
        id: "midnight",
        name: "Midnight",
        default_font: "modern",
        background: "#0f172a",
        background_end: Some("#1e293b"),
        heading_color: "#fde68a",
        body_color: "#cbd5e1",
        accent_color: "#fbbf24",
        is_dark: true,
        content_align: ContentAlign::Center,
        decor: Decor::None,
    },
    Theme {
        id: "editorial",
        name: "Editorial",
        default_font: "mincho",
        background: "#ffffff",
        background_end: None,
        heading_color: "#0f172a",
        body_color: "#1e293b",
        accent_color: "#0f172a",
        is_dark: false,
        content_align: ContentAlign::Center,
        decor: Decor::TopBar,
    },
];

/// Look up a theme by id, falling back to the first built-in theme.
pub fn theme_by_id(id: &str) -> &'static Theme {
    THEMES.iter().find(|t| t.id == id).unwrap_or(&THEMES[0])
}

/// Look up a font by id, falling back to the first font option.
pub fn font_by_id(id: &str) -> &'static FontOption {
    FONTS.iter().find(|f| f.id == id).unwrap_or(&FONTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_first() {
        assert_eq!(theme_by_id("nope").id, THEMES[0].id);
        assert_eq!(theme_by_id("midnight").id, "midnight");
    }

    #[test]
    fn theme_default_fonts_exist() {
        for theme in THEMES {
            assert_eq!(font_by_id(theme.default_font).id, theme.default_font);
        }
    }
}
