//! Typed model of the vision payload and the enhanced action item.
//!
//! The vision model returns loosely shaped JSON: any key may be missing or
//! `null`, enum strings may be capitalized or unknown, and table cells may be
//! numbers. Deserialization here absorbs all of that so downstream code only
//! sees concrete values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Priority of an action item. Declaration order is sort order (high first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Capitalized label used in tables ("High").
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// Work category inferred for an action item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Development,
    Research,
    Communication,
    Documentation,
    Testing,
    Planning,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Development => "development",
            Category::Research => "research",
            Category::Communication => "communication",
            Category::Documentation => "documentation",
            Category::Testing => "testing",
            Category::Planning => "planning",
            Category::General => "general",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(Category::Development),
            "research" => Ok(Category::Research),
            "communication" => Ok(Category::Communication),
            "documentation" => Ok(Category::Documentation),
            "testing" => Ok(Category::Testing),
            "planning" => Ok(Category::Planning),
            "general" => Ok(Category::General),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// Estimated effort for an action item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    High,
    Medium,
    Low,
}

impl Effort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effort::High => "high",
            Effort::Medium => "medium",
            Effort::Low => "low",
        }
    }
}

impl std::fmt::Display for Effort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Effort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Effort::High),
            "medium" => Ok(Effort::Medium),
            "low" => Ok(Effort::Low),
            other => Err(format!("unknown effort '{other}'")),
        }
    }
}

/// Kind of a whiteboard section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    #[default]
    Text,
    Diagram,
    Table,
}

impl FromStr for SectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(SectionType::Text),
            "diagram" => Ok(SectionType::Diagram),
            "table" => Ok(SectionType::Table),
            other => Err(format!("unknown section type '{other}'")),
        }
    }
}

/// Kind of a drawn diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    Flowchart,
    Mindmap,
    #[default]
    Drawing,
}

impl DiagramType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramType::Flowchart => "flowchart",
            DiagramType::Mindmap => "mindmap",
            DiagramType::Drawing => "drawing",
        }
    }

    /// Title-cased label ("Flowchart").
    pub fn label(&self) -> &'static str {
        match self {
            DiagramType::Flowchart => "Flowchart",
            DiagramType::Mindmap => "Mindmap",
            DiagramType::Drawing => "Drawing",
        }
    }
}

impl FromStr for DiagramType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flowchart" => Ok(DiagramType::Flowchart),
            "mindmap" => Ok(DiagramType::Mindmap),
            "drawing" => Ok(DiagramType::Drawing),
            other => Err(format!("unknown diagram type '{other}'")),
        }
    }
}

/// A titled block of whiteboard text, optionally with nested subsections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, deserialize_with = "text")]
    pub heading: String,
    #[serde(default, deserialize_with = "text")]
    pub content: String,
    #[serde(default, deserialize_with = "object_list")]
    pub subsections: Vec<Section>,
    #[serde(rename = "type", default, deserialize_with = "lenient_or_default")]
    pub section_type: SectionType,
}

impl Section {
    pub fn new(heading: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            content: content.into(),
            ..Default::default()
        }
    }
}

/// A table transcribed from the board. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, deserialize_with = "text")]
    pub title: String,
    #[serde(default, deserialize_with = "string_list")]
    pub headers: Vec<String>,
    #[serde(default, deserialize_with = "string_rows")]
    pub rows: Vec<Vec<String>>,
}

/// A drawn diagram with its recognized elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(rename = "type", default, deserialize_with = "lenient_or_default")]
    pub diagram_type: DiagramType,
    #[serde(default, deserialize_with = "text")]
    pub description: String,
    #[serde(default, deserialize_with = "string_list")]
    pub elements: Vec<String>,
}

/// An action item as supplied by the vision model; any field besides `task`
/// may be missing and is inferred later.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawActionItem {
    #[serde(default, deserialize_with = "text")]
    pub task: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "non_blank", skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, deserialize_with = "non_blank", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub effort: Option<Effort>,
}

impl RawActionItem {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            ..Default::default()
        }
    }
}

/// A fully enhanced action item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub task: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    pub category: Category,
    pub effort: Effort,
}

/// The analysis returned by the vision model for one whiteboard image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAnalysis {
    #[serde(default, deserialize_with = "text")]
    pub title: String,
    #[serde(default, deserialize_with = "object_list")]
    pub sections: Vec<Section>,
    #[serde(default, deserialize_with = "object_list")]
    pub tables: Vec<Table>,
    #[serde(default, deserialize_with = "object_list")]
    pub diagrams: Vec<Diagram>,
    #[serde(default, deserialize_with = "action_items")]
    pub action_items: Vec<RawActionItem>,
    #[serde(default, deserialize_with = "string_list")]
    pub key_points: Vec<String>,
    #[serde(default, deserialize_with = "text")]
    pub raw_text: String,
    #[serde(default, deserialize_with = "confidence", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl RawAnalysis {
    /// Parse a vision payload.
    ///
    /// Only malformed JSON or a scalar top level is an error. Missing, null or
    /// mistyped fields fall back to defaults, and list entries of the wrong
    /// shape are dropped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Returns `Some(s)` when `s` has visible characters.
pub fn non_empty(s: &str) -> Option<&str> {
    if s.trim().is_empty() { None } else { Some(s) }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Scalar text field: strings as-is, numbers and booleans stringified,
/// anything else empty.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text).unwrap_or_default())
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(scalar_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn confidence<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .filter(|c: &f64| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0)))
}

/// Entries of a list field. `null` is empty and a lone value is a list of one.
fn entries(value: Option<Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
    }
}

/// List of objects; entries that do not convert are dropped.
fn object_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = entries(Option::<Value>::deserialize(deserializer)?);
    Ok(values
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

/// Action items may be objects or bare task strings.
fn action_items<'de, D>(deserializer: D) -> Result<Vec<RawActionItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = entries(Option::<Value>::deserialize(deserializer)?);
    Ok(values
        .into_iter()
        .filter_map(|v| match v {
            Value::String(task) => Some(RawActionItem::new(task)),
            Value::Object(_) => serde_json::from_value(v).ok(),
            _ => None,
        })
        .collect())
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = entries(Option::<Value>::deserialize(deserializer)?);
    Ok(values
        .iter()
        .map(|v| cell_text(v).unwrap_or_default())
        .collect())
}

fn string_rows<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = entries(Option::<Value>::deserialize(deserializer)?);
    Ok(rows
        .into_iter()
        .map(|row| {
            entries(Some(row))
                .iter()
                .map(|v| cell_text(v).unwrap_or_default())
                .collect()
        })
        .collect())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Stringify a table cell. Arrays and objects are rendered as JSON.
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        scalar => scalar_text(scalar),
    }
}
