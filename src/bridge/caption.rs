//! Caption post-processing.
//!
//! Language models are asked for plain text but routinely emit Markdown
//! anyway, so caption responses are scrubbed of formatting before they
//! reach the user. Thread-mode responses arrive as one string with `|||`
//! between parts.

/// Separator between parts of a thread-mode caption response.
pub const THREAD_SEPARATOR: &str = "|||";

/// Strip Markdown formatting from a caption, leaving plain text.
///
/// Removes emphasis markers, heading prefixes, inline code ticks, paired
/// strikethrough, blockquote and list prefixes, and collapses links to
/// their text.
pub fn clean_caption(text: &str) -> String {
    let mut s = text.replace("**", "");
    s = s.replace('*', "");
    s = strip_line_prefixes(&s);
    s = s.replace("__", "");
    s = s.replace('_', "");
    s = s.replace('`', "");
    s = strip_strikethrough(&s);
    s = collapse_links(&s);
    s.trim().to_string()
}

/// Split a thread-mode response into cleaned, non-empty caption parts.
pub fn split_thread(text: &str) -> Vec<String> {
    text.split(THREAD_SEPARATOR)
        .map(clean_caption)
        .filter(|part| !part.is_empty())
        .collect()
}

fn strip_line_prefixes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(strip_prefix(line));
    }
    if text.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn strip_prefix(line: &str) -> &str {
    // Headings: runs of '#' followed by a space.
    let hashes = line.len() - line.trim_start_matches('#').len();
    if hashes > 0 {
        if let Some(rest) = line[hashes..].strip_prefix(' ') {
            return rest;
        }
    }
    // Blockquotes.
    if let Some(rest) = line.strip_prefix("> ") {
        return rest;
    }
    if let Some(rest) = line.strip_prefix('>') {
        return rest;
    }
    // Bullet markers.
    for marker in ["- ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest;
        }
    }
    // Numbered lists: digits, dot, space.
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return rest;
        }
    }
    line
}

fn strip_strikethrough(text: &str) -> String {
    let mut s = text.to_string();
    // Drop paired ~~ markers only; a lone run stays put.
    while let Some(a) = s.find("~~") {
        match s[a + 2..].find("~~") {
            Some(off) => {
                let b = a + 2 + off;
                s.replace_range(b..b + 2, "");
                s.replace_range(a..a + 2, "");
            }
            None => break,
        }
    }
    s
}

fn collapse_links(text: &str) -> String {
    let mut s = text.to_string();
    let mut from = 0;
    while let Some(open) = s[from..].find('[').map(|i| from + i) {
        let Some(close) = s[open..].find(']').map(|i| open + i) else {
            break;
        };
        if s[close + 1..].starts_with('(') {
            if let Some(end) = s[close + 1..].find(')').map(|i| close + 1 + i) {
                let label = s[open + 1..close].to_string();
                s.replace_range(open..=end, &label);
                from = open + label.len();
                continue;
            }
        }
        from = close + 1;
    }
    s
}
