//! Format renderers. Each consumes structured contents plus validated options
//! and returns the document body.

pub mod confluence;
pub mod markdown;
pub mod mindmap;
pub mod notion;
pub mod pptx;
pub mod slides;

use scribe_core::Priority;

/// Checklist glyph for a priority.
pub(crate) fn priority_emoji(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

/// RGB hex color for a priority (crimson, dark orange, forest green).
pub(crate) fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "DC143C",
        Priority::Medium => "FF8C00",
        Priority::Low => "228B22",
    }
}

/// Make text safe inside a pipe-delimited table cell.
pub(crate) fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Single-line heading text: whitespace runs collapse to one space, blank
/// text becomes `fallback`.
pub(crate) fn heading(text: &str, fallback: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() { fallback.to_string() } else { collapsed }
}

/// Escape text for XML attribute and element content.
pub(crate) fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters other than tab and newline are not valid XML 1.0.
            c if c.is_control() && c != '\t' && c != '\n' => {}
            c => out.push(c),
        }
    }
    out
}
