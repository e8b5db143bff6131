//! Document statistics.

use serde::{Deserialize, Serialize};

use crate::model::{ActionItem, Diagram, Priority, Section, Table};

/// Words per minute used for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;

/// Counts describing one structured whiteboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub total_sections: usize,
    pub total_action_items: usize,
    pub high_priority_items: usize,
    pub total_key_points: usize,
    pub tables_count: usize,
    pub diagrams_count: usize,
    pub word_count: usize,
    /// Minutes, never below one.
    pub estimated_reading_time: usize,
}

/// Reading time in whole minutes, at least one.
pub fn reading_time(word_count: usize) -> usize {
    (word_count / WORDS_PER_MINUTE).max(1)
}

pub fn compute_statistics(
    sections: &[Section],
    action_items: &[ActionItem],
    key_points: &[String],
    tables: &[Table],
    diagrams: &[Diagram],
    raw_text: &str,
) -> Statistics {
    let word_count = raw_text.split_whitespace().count();
    Statistics {
        total_sections: sections.len(),
        total_action_items: action_items.len(),
        high_priority_items: action_items
            .iter()
            .filter(|item| item.priority == Priority::High)
            .count(),
        total_key_points: key_points.len(),
        tables_count: tables.len(),
        diagrams_count: diagrams.len(),
        word_count,
        estimated_reading_time: reading_time(word_count),
    }
}
