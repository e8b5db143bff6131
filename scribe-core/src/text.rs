//! Small string helpers shared by the structurer and the exporters.

/// Truncate to at most `max_chars` characters, appending "..." when cut.
///
/// Counts `char`s, so multi-byte text is never split mid code point.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
        None => s.to_string(),
    }
}

/// Upper-case the first letter and lower-case the rest ("aNA" -> "Ana").
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Returns `text` unless it is blank, in which case `fallback`.
pub fn or_default<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.trim().is_empty() { fallback } else { text }
}
