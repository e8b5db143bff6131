//! Frequency-ranked keyword extraction.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Maximum number of document-level concepts.
pub const MAX_CONCEPTS: usize = 20;

/// Number of keywords used as a section fingerprint.
pub const MAX_KEYWORDS: usize = 10;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-z]+\b").expect("valid regex"));

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should",
];

/// Rank the words of `text` by frequency, ties in first-seen order.
fn ranked_words(text: &str, limit: usize) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for m in WORD.find_iter(&lower) {
        let word = m.as_str();
        if word.len() <= 3 || STOP_WORDS.contains(&word) {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // Stable sort keeps first-seen order among equal counts.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().take(limit).map(str::to_string).collect()
}

/// Up to 20 key concepts of a document.
pub fn extract_concepts(text: &str) -> Vec<String> {
    ranked_words(text, MAX_CONCEPTS)
}

/// Up to 10 keywords, used to fingerprint a section for clustering.
pub fn extract_keywords(text: &str) -> Vec<String> {
    ranked_words(text, MAX_KEYWORDS)
}
