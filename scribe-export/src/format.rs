//! Export formats and the catalog describing them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ExportError;

/// The five supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Pptx,
    Mindmap,
    Notion,
    Confluence,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Markdown,
        ExportFormat::Pptx,
        ExportFormat::Mindmap,
        ExportFormat::Notion,
        ExportFormat::Confluence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Pptx => "pptx",
            ExportFormat::Mindmap => "mindmap",
            ExportFormat::Notion => "notion",
            ExportFormat::Confluence => "confluence",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "Markdown",
            ExportFormat::Pptx => "PowerPoint",
            ExportFormat::Mindmap => "Mind Map",
            ExportFormat::Notion => "Notion",
            ExportFormat::Confluence => "Confluence",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "Clean markdown with tables and task lists",
            ExportFormat::Pptx => "Presentation slides",
            ExportFormat::Mindmap => "Mind map tree as JSON, XMind-style JSON or FreeMind XML",
            ExportFormat::Notion => "Notion-compatible markdown",
            ExportFormat::Confluence => "Confluence wiki markup",
        }
    }

    /// Default file extension (the mind map extension depends on its options).
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown | ExportFormat::Notion => "md",
            ExportFormat::Pptx => "pptx",
            ExportFormat::Mindmap => "json",
            ExportFormat::Confluence => "txt",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "pptx" | "slides" => Ok(ExportFormat::Pptx),
            "mindmap" => Ok(ExportFormat::Mindmap),
            "notion" => Ok(ExportFormat::Notion),
            "confluence" => Ok(ExportFormat::Confluence),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Value type of an export option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Boolean,
    Select,
    Number,
    String,
}

/// One recognized option of a format.
#[derive(Debug, Clone, Serialize)]
pub struct OptionSpec {
    pub key: &'static str,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub options: &'static [&'static str],
    pub default: Value,
}

impl OptionSpec {
    fn boolean(key: &'static str, default: bool) -> Self {
        Self {
            key,
            kind: OptionKind::Boolean,
            options: &[],
            default: json!(default),
        }
    }

    fn select(key: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            key,
            kind: OptionKind::Select,
            options,
            default: json!(options[0]),
        }
    }

    fn number(key: &'static str, default: u32) -> Self {
        Self {
            key,
            kind: OptionKind::Number,
            options: &[],
            default: json!(default),
        }
    }

    fn string(key: &'static str) -> Self {
        Self {
            key,
            kind: OptionKind::String,
            options: &[],
            default: json!(""),
        }
    }
}

/// Catalog entry describing a format.
#[derive(Debug, Clone, Serialize)]
pub struct FormatInfo {
    pub id: ExportFormat,
    pub name: &'static str,
    pub description: &'static str,
    pub extension: &'static str,
    pub options: Vec<OptionSpec>,
}

/// Every format with its recognized options and defaults.
pub fn format_catalog() -> Vec<FormatInfo> {
    ExportFormat::ALL
        .iter()
        .map(|&format| FormatInfo {
            id: format,
            name: format.display_name(),
            description: format.description(),
            extension: format.extension(),
            options: match format {
                ExportFormat::Markdown => vec![
                    OptionSpec::boolean("include_images", true),
                    OptionSpec::boolean("include_diagrams", true),
                    OptionSpec::select("table_format", &["github", "grid"]),
                ],
                ExportFormat::Pptx => vec![
                    OptionSpec::select("template", &["default", "minimal", "corporate"]),
                    OptionSpec::number("slides_per_section", 1),
                    OptionSpec::boolean("include_notes", true),
                ],
                ExportFormat::Mindmap => vec![
                    OptionSpec::select("format", &["json", "xmind", "freemind"]),
                    OptionSpec::number("max_depth", 5),
                    OptionSpec::boolean("include_colors", true),
                ],
                ExportFormat::Notion => vec![
                    OptionSpec::string("page_title"),
                    OptionSpec::boolean("include_properties", true),
                ],
                ExportFormat::Confluence => vec![
                    OptionSpec::string("space_key"),
                    OptionSpec::boolean("include_macros", true),
                ],
            },
        })
        .collect()
}
