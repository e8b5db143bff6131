//! Meeting-level insights: meeting type, themes, decisions, questions, next steps.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{ActionItem, Priority};

const MAX_THEMES: usize = 5;
const MAX_DECISIONS: usize = 5;
const MAX_QUESTIONS: usize = 5;
const MAX_NEXT_STEPS: usize = 3;

static DECISION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bdecided to (.+)",
        r"(?i)\bdecision: (.+)",
        r"(?i)\bwe will (.+)",
        r"(?i)\bagreed to (.+)",
        r"(?i)\bconclusion: (.+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]*\?").expect("valid regex"));

/// Kind of meeting the board most likely came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    Standup,
    Retrospective,
    Planning,
    Brainstorming,
    DecisionMaking,
    #[default]
    General,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Standup => "standup",
            MeetingType::Retrospective => "retrospective",
            MeetingType::Planning => "planning",
            MeetingType::Brainstorming => "brainstorming",
            MeetingType::DecisionMaking => "decision_making",
            MeetingType::General => "general",
        }
    }
}

impl std::fmt::Display for MeetingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const MEETING_FAMILIES: &[(MeetingType, &[&str])] = &[
    (MeetingType::Standup, &["standup", "daily", "scrum"]),
    (
        MeetingType::Retrospective,
        &["retrospective", "retro", "review"],
    ),
    (MeetingType::Planning, &["planning", "roadmap", "strategy"]),
    (
        MeetingType::Brainstorming,
        &["brainstorm", "ideation", "creative"],
    ),
    (MeetingType::DecisionMaking, &["decision", "vote", "choose"]),
];

/// Derived observations about a meeting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insights {
    pub meeting_type: MeetingType,
    pub main_themes: Vec<String>,
    pub decision_points: Vec<String>,
    pub open_questions: Vec<String>,
    pub next_steps: Vec<String>,
}

/// Classify the meeting by the first keyword family found in the text.
pub fn detect_meeting_type(text: &str) -> MeetingType {
    let lower = text.to_lowercase();
    MEETING_FAMILIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(kind, _)| *kind)
        .unwrap_or_default()
}

/// Decision statements, pattern by pattern, first five.
pub fn extract_decisions(text: &str) -> Vec<String> {
    DECISION_PATTERNS
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|d| !d.is_empty())
        .take(MAX_DECISIONS)
        .collect()
}

/// Question sentences of reasonable length, first five.
pub fn extract_questions(text: &str) -> Vec<String> {
    QUESTION
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|q| {
            let len = q.chars().count();
            len > 10 && len < 200
        })
        .take(MAX_QUESTIONS)
        .map(str::to_string)
        .collect()
}

/// Compute insights from the raw text, concepts and enhanced action items.
pub fn generate_insights(raw_text: &str, concepts: &[String], action_items: &[ActionItem]) -> Insights {
    Insights {
        meeting_type: detect_meeting_type(raw_text),
        main_themes: concepts.iter().take(MAX_THEMES).cloned().collect(),
        decision_points: extract_decisions(raw_text),
        open_questions: extract_questions(raw_text),
        next_steps: action_items
            .iter()
            .filter(|item| item.priority == Priority::High)
            .take(MAX_NEXT_STEPS)
            .map(|item| item.task.clone())
            .collect(),
    }
}
