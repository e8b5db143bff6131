//! Action item mining and enhancement.
//!
//! Free text is scanned with line-oriented patterns (explicit markers, bullets,
//! numbered lists, arrows, stars). Each candidate is enhanced with a priority,
//! assignee, deadline, category and effort inferred from keyword heuristics,
//! near-duplicates are dropped and the result is ordered high priority first.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::model::{ActionItem, Category, Effort, Priority, RawActionItem};
use crate::text::title_case;

/// Candidates this short (after trimming) are treated as noise.
const MIN_TASK_CHARS: usize = 5;

/// Word-overlap ratio above which two tasks are considered the same.
const DUPLICATE_OVERLAP: f64 = 0.6;

static TASK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        // Explicit markers anywhere in a line
        r"(?im)\b(?:TODO|TO-?DO|ACTION|TASK)\s*:[ \t]*(.+)$",
        // Bullets and checkboxes
        r"(?m)^[ \t]*[-*•][ \t]*(?:\[[ xX]?\][ \t]*)?(.+)$",
        // Numbered and lettered lists
        r"(?m)^[ \t]*(?:\d+[.)]|[A-Za-z]\))[ \t]+(.+)$",
        // Arrows
        r"(?m)^[ \t]*→[ \t]*(.+)$",
        // Stars
        r"(?m)^[ \t]*⭐[ \t]*(.+)$",
    ])
});

static ASSIGNEE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"@([A-Za-z]+)",
        r"(?i)assigned to ([A-Za-z]+)",
        r"(?i)([A-Za-z]+) will",
        r"(?i)([A-Za-z]+) should",
        r"(?i)([A-Za-z]+) needs to",
    ])
});

static DEADLINE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\bby ([A-Za-z]+ \d+)",
        r"(?i)\bdue ([A-Za-z]+ \d+)",
        r"(?i)\bdeadline ([A-Za-z]+ \d+)",
        r"(?i)\b(next week|this week|tomorrow|today)\b",
        r"(\d+/\d+/\d+)",
        r"(\d+-\d+-\d+)",
    ])
});

const HIGH_PRIORITY: &[&str] = &["urgent", "asap", "critical", "important", "priority", "deadline"];
const MEDIUM_PRIORITY: &[&str] = &["soon", "next week", "follow up", "check", "review"];
const LOW_PRIORITY: &[&str] = &["later", "eventually", "consider", "maybe", "optional"];

const CATEGORIES: &[(Category, &[&str])] = &[
    (
        Category::Development,
        &["code", "develop", "build", "implement", "program", "debug"],
    ),
    (
        Category::Research,
        &["research", "investigate", "study", "analyze", "explore"],
    ),
    (
        Category::Communication,
        &["email", "call", "meeting", "discuss", "contact", "inform"],
    ),
    (
        Category::Documentation,
        &["document", "write", "update", "record", "note"],
    ),
    (
        Category::Testing,
        &["test", "verify", "validate", "check", "review"],
    ),
    (
        Category::Planning,
        &["plan", "schedule", "organize", "prepare", "setup"],
    ),
];

const EFFORTS: &[(Effort, &[&str])] = &[
    (
        Effort::High,
        &["develop", "build", "create", "design", "implement", "research"],
    ),
    (
        Effort::Medium,
        &["update", "modify", "review", "analyze", "test"],
    ),
    (Effort::Low, &["call", "email", "check", "ask", "inform"]),
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Extract action items from free text.
pub fn extract_tasks(text: &str) -> Vec<ActionItem> {
    let mut candidates = Vec::new();
    for pattern in TASK_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            let task = m.as_str().trim();
            if task.chars().count() > MIN_TASK_CHARS {
                candidates.push(task.to_string());
            }
        }
    }

    let found = candidates.len();
    let mut tasks: Vec<ActionItem> = candidates
        .into_iter()
        .map(|task| enhance(&RawActionItem::new(task)))
        .collect();
    tasks = deduplicate(tasks);
    sort_by_priority(&mut tasks);

    debug!(candidates = found, kept = tasks.len(), "Extracted tasks from text");
    tasks
}

/// Infer a priority from keywords in the task text.
pub fn infer_priority(text: &str) -> Priority {
    let lower = text.to_lowercase();
    if contains_any(&lower, HIGH_PRIORITY) {
        return Priority::High;
    }
    if contains_any(&lower, MEDIUM_PRIORITY) {
        return Priority::Medium;
    }
    if contains_any(&lower, LOW_PRIORITY) {
        return Priority::Low;
    }

    if contains_any(&lower, &["must", "need", "required", "asap"]) {
        Priority::High
    } else if contains_any(&lower, &["should", "want", "prefer"]) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Find the person a task is addressed to, title-cased.
pub fn extract_assignee(text: &str) -> Option<String> {
    ASSIGNEE_PATTERNS
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| title_case(m.as_str()))
}

/// Find a due date or relative deadline, as written.
pub fn extract_deadline(text: &str) -> Option<String> {
    DEADLINE_PATTERNS
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Categorize a task by its first matching keyword family.
pub fn categorize(text: &str) -> Category {
    let lower = text.to_lowercase();
    CATEGORIES
        .iter()
        .find(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}

/// Estimate effort by keyword; unknown work defaults to medium.
pub fn estimate_effort(text: &str) -> Effort {
    let lower = text.to_lowercase();
    EFFORTS
        .iter()
        .find(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(effort, _)| *effort)
        .unwrap_or(Effort::Medium)
}

/// Fill in every missing field of a raw action item.
pub fn enhance(raw: &RawActionItem) -> ActionItem {
    let task = raw.task.trim();
    ActionItem {
        task: task.to_string(),
        priority: raw.priority.unwrap_or_else(|| infer_priority(task)),
        assignee: raw.assignee.clone().or_else(|| extract_assignee(task)),
        deadline: raw.deadline.clone().or_else(|| extract_deadline(task)),
        category: raw.category.unwrap_or_else(|| categorize(task)),
        effort: raw.effort.unwrap_or_else(|| estimate_effort(task)),
    }
}

/// Enhance model-supplied items and order them by priority.
///
/// Items without task text are dropped. Short items are kept; the minimum
/// length applies only to tasks mined from free text.
pub fn enhance_all(items: &[RawActionItem]) -> Vec<ActionItem> {
    let mut enhanced: Vec<ActionItem> = items
        .iter()
        .filter(|item| !item.task.trim().is_empty())
        .map(enhance)
        .collect();
    sort_by_priority(&mut enhanced);
    enhanced
}

/// Stable sort, high priority first.
pub fn sort_by_priority(items: &mut [ActionItem]) {
    items.sort_by_key(|item| item.priority);
}

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Whether two task texts share enough words to be the same task.
pub fn is_duplicate(a: &str, b: &str) -> bool {
    let (wa, wb) = (word_set(a), word_set(b));
    let smaller = wa.len().min(wb.len());
    if smaller == 0 {
        return false;
    }
    let overlap = wa.intersection(&wb).count();
    overlap as f64 / smaller as f64 > DUPLICATE_OVERLAP
}

/// Drop tasks that duplicate an earlier one, keeping first occurrences.
pub fn deduplicate(items: Vec<ActionItem>) -> Vec<ActionItem> {
    let mut kept: Vec<ActionItem> = Vec::with_capacity(items.len());
    for item in items {
        if !kept.iter().any(|k| is_duplicate(&k.task, &item.task)) {
            kept.push(item);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task_texts(items: &[ActionItem]) -> Vec<&str> {
        items.iter().map(|i| i.task.as_str()).collect()
    }

    #[test]
    fn test_extract_markers() {
        let tasks = extract_tasks("Notes\nTODO: update the roadmap\nACTION: email the vendor");
        let texts = task_texts(&tasks);
        assert!(texts.contains(&"update the roadmap"));
        assert!(texts.contains(&"email the vendor"));
    }

    #[test]
    fn test_extract_bullets_and_checkboxes() {
        let tasks = extract_tasks("- Prepare the demo\n* [ ] Book the venue\n• Print handouts");
        let texts = task_texts(&tasks);
        assert!(texts.contains(&"Prepare the demo"));
        assert!(texts.contains(&"Book the venue"));
        assert!(texts.contains(&"Print handouts"));
    }

    #[test]
    fn test_extract_numbered_arrow_star() {
        let tasks = extract_tasks("1. Draft the proposal\nb) Collect feedback\n→ Publish results\n⭐ Celebrate launch");
        let texts = task_texts(&tasks);
        assert!(texts.contains(&"Draft the proposal"));
        assert!(texts.contains(&"Collect feedback"));
        assert!(texts.contains(&"Publish results"));
        assert!(texts.contains(&"Celebrate launch"));
    }

    #[test]
    fn test_short_candidates_discarded() {
        let tasks = extract_tasks("- ok\n- fix\n- Ship it");
        assert_eq!(task_texts(&tasks), vec!["Ship it"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_tasks("").is_empty());
        assert!(extract_tasks("Just a paragraph of prose.").is_empty());
    }

    #[test]
    fn test_marker_inside_bullet_counts_once() {
        let tasks = extract_tasks("- TODO: fix login bug");
        assert_eq!(task_texts(&tasks), vec!["fix login bug"]);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let tasks = extract_tasks("- Call John about budget\n- Call John re budget");
        assert_eq!(task_texts(&tasks), vec!["Call John about budget"]);
    }

    #[test]
    fn test_is_duplicate_threshold() {
        assert!(is_duplicate("Call John about budget", "Call John re budget"));
        // 3 of 5 shared words is exactly 0.6, which is not above the threshold
        assert!(!is_duplicate("alpha beta gamma delta epsilon", "alpha beta gamma zeta eta"));
        assert!(!is_duplicate("", "anything here"));
    }

    #[test]
    fn test_priority_high_wins_over_medium() {
        assert_eq!(infer_priority("urgent: review the contract"), Priority::High);
        assert_eq!(infer_priority("Review the contract, urgent"), Priority::High);
    }

    #[test]
    fn test_priority_keyword_sets() {
        assert_eq!(infer_priority("Fix the critical outage"), Priority::High);
        assert_eq!(infer_priority("Follow up with legal"), Priority::Medium);
        assert_eq!(infer_priority("Maybe refresh the logo"), Priority::Low);
    }

    #[test]
    fn test_priority_fallback() {
        assert_eq!(infer_priority("We must renew the license"), Priority::High);
        assert_eq!(infer_priority("Ops should rotate keys"), Priority::Medium);
        assert_eq!(infer_priority("Rename the channel"), Priority::Low);
    }

    #[test]
    fn test_assignee_patterns() {
        assert_eq!(extract_assignee("Send slides @maria").as_deref(), Some("Maria"));
        assert_eq!(
            extract_assignee("Budget review assigned to PETER").as_deref(),
            Some("Peter")
        );
        assert_eq!(extract_assignee("ana will draft the memo").as_deref(), Some("Ana"));
        assert_eq!(extract_assignee("Send report"), None);
    }

    #[test]
    fn test_deadline_patterns() {
        assert_eq!(extract_deadline("Ship by March 15").as_deref(), Some("March 15"));
        assert_eq!(extract_deadline("Report due Friday 3").as_deref(), Some("Friday 3"));
        assert_eq!(extract_deadline("Finish it tomorrow").as_deref(), Some("tomorrow"));
        assert_eq!(extract_deadline("Renew before 12/31/2025").as_deref(), Some("12/31/2025"));
        assert_eq!(extract_deadline("Kickoff on 2025-01-06").as_deref(), Some("2025-01-06"));
        assert_eq!(extract_deadline("Nothing scheduled"), None);
    }

    #[test]
    fn test_categorize() {
        assert_eq!(categorize("Implement the parser"), Category::Development);
        assert_eq!(categorize("Investigate churn"), Category::Research);
        assert_eq!(categorize("Email the client"), Category::Communication);
        assert_eq!(categorize("Write release notes"), Category::Documentation);
        assert_eq!(categorize("Verify the fix"), Category::Testing);
        assert_eq!(categorize("Schedule the offsite"), Category::Planning);
        assert_eq!(categorize("Buy snacks"), Category::General);
    }

    #[test]
    fn test_estimate_effort() {
        assert_eq!(estimate_effort("Design the schema"), Effort::High);
        assert_eq!(estimate_effort("Update the wiki"), Effort::Medium);
        assert_eq!(estimate_effort("Ask finance"), Effort::Low);
        assert_eq!(estimate_effort("Buy snacks"), Effort::Medium);
    }

    #[test]
    fn test_enhance_fills_only_missing() {
        let raw = RawActionItem {
            task: "  urgent: Ana will email the vendor by June 2  ".into(),
            priority: Some(Priority::Low),
            ..Default::default()
        };
        let item = enhance(&raw);
        assert_eq!(item.task, "urgent: Ana will email the vendor by June 2");
        assert_eq!(item.priority, Priority::Low);
        assert_eq!(item.assignee.as_deref(), Some("Ana"));
        assert_eq!(item.deadline.as_deref(), Some("June 2"));
        assert_eq!(item.category, Category::Communication);
        assert_eq!(item.effort, Effort::Low);
    }

    #[test]
    fn test_enhance_keeps_supplied_assignee() {
        let raw = RawActionItem {
            task: "Bob will prepare slides".into(),
            assignee: Some("Carol".into()),
            ..Default::default()
        };
        assert_eq!(enhance(&raw).assignee.as_deref(), Some("Carol"));
    }

    #[test]
    fn test_enhance_all_sorts_and_drops_blank() {
        let items = vec![
            RawActionItem::new("Rename the channel"),
            RawActionItem::new("   "),
            RawActionItem::new("Fix the critical outage"),
            RawActionItem::new("Follow up with legal"),
        ];
        let enhanced = enhance_all(&items);
        assert_eq!(
            task_texts(&enhanced),
            vec!["Fix the critical outage", "Follow up with legal", "Rename the channel"]
        );
    }

    #[test]
    fn test_enhance_all_keeps_short_supplied_tasks() {
        let enhanced = enhance_all(&[RawActionItem::new("Ship")]);
        assert_eq!(task_texts(&enhanced), vec!["Ship"]);
        assert!(extract_tasks("- Ship").is_empty());
    }

    #[test]
    fn test_sort_is_stable() {
        let tasks = extract_tasks("- Rename channel one\n- Urgent fix for prod\n- Rename folder two");
        assert_eq!(
            task_texts(&tasks),
            vec!["Urgent fix for prod", "Rename channel one", "Rename folder two"]
        );
    }
}
