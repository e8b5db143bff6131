//! Per-format export options.
//!
//! Options arrive as a flat JSON object. Unknown keys are ignored; a known key
//! with the wrong type or an unrecognized choice is rejected before rendering.

use serde_json::{Map, Value};

use crate::error::ExportError;
use crate::format::ExportFormat;

/// Markdown table flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableFormat {
    #[default]
    Github,
    Grid,
}

/// Color scheme of the slide deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlideTemplate {
    #[default]
    Default,
    Minimal,
    Corporate,
}

/// Serialization of the mind map tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MindMapFormat {
    #[default]
    Json,
    Xmind,
    Freemind,
}

impl MindMapFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            MindMapFormat::Json => "json",
            MindMapFormat::Xmind => "xmind",
            MindMapFormat::Freemind => "mm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Accepted for compatibility; whiteboard images are not embedded.
    pub include_images: bool,
    pub include_diagrams: bool,
    pub table_format: TableFormat,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            include_images: true,
            include_diagrams: true,
            table_format: TableFormat::Github,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideOptions {
    pub template: SlideTemplate,
    pub slides_per_section: usize,
    /// Accepted for compatibility; speaker notes are not generated.
    pub include_notes: bool,
}

impl Default for SlideOptions {
    fn default() -> Self {
        Self {
            template: SlideTemplate::Default,
            slides_per_section: 1,
            include_notes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MindMapOptions {
    pub format: MindMapFormat,
    pub max_depth: usize,
    pub include_colors: bool,
}

impl Default for MindMapOptions {
    fn default() -> Self {
        Self {
            format: MindMapFormat::Json,
            max_depth: 5,
            include_colors: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionOptions {
    pub page_title: String,
    pub include_properties: bool,
}

impl Default for NotionOptions {
    fn default() -> Self {
        Self {
            page_title: String::new(),
            include_properties: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfluenceOptions {
    pub space_key: String,
    pub include_macros: bool,
}

impl Default for ConfluenceOptions {
    fn default() -> Self {
        Self {
            space_key: String::new(),
            include_macros: true,
        }
    }
}

/// Validated options for one format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOptions {
    Markdown(MarkdownOptions),
    Slides(SlideOptions),
    MindMap(MindMapOptions),
    Notion(NotionOptions),
    Confluence(ConfluenceOptions),
}

impl ExportOptions {
    /// Parse the raw option object for `format`.
    pub fn parse(format: ExportFormat, raw: &Map<String, Value>) -> Result<Self, ExportError> {
        let reader = OptionReader(raw);
        let options = match format {
            ExportFormat::Markdown => {
                let d = MarkdownOptions::default();
                ExportOptions::Markdown(MarkdownOptions {
                    include_images: reader.boolean("include_images", d.include_images)?,
                    include_diagrams: reader.boolean("include_diagrams", d.include_diagrams)?,
                    table_format: reader.choice(
                        "table_format",
                        &[("github", TableFormat::Github), ("grid", TableFormat::Grid)],
                        d.table_format,
                    )?,
                })
            }
            ExportFormat::Pptx => {
                let d = SlideOptions::default();
                ExportOptions::Slides(SlideOptions {
                    template: reader.choice(
                        "template",
                        &[
                            ("default", SlideTemplate::Default),
                            ("minimal", SlideTemplate::Minimal),
                            ("corporate", SlideTemplate::Corporate),
                        ],
                        d.template,
                    )?,
                    slides_per_section: reader
                        .positive("slides_per_section", d.slides_per_section)?,
                    include_notes: reader.boolean("include_notes", d.include_notes)?,
                })
            }
            ExportFormat::Mindmap => {
                let d = MindMapOptions::default();
                ExportOptions::MindMap(MindMapOptions {
                    format: reader.choice(
                        "format",
                        &[
                            ("json", MindMapFormat::Json),
                            ("xmind", MindMapFormat::Xmind),
                            ("freemind", MindMapFormat::Freemind),
                        ],
                        d.format,
                    )?,
                    max_depth: reader.positive("max_depth", d.max_depth)?,
                    include_colors: reader.boolean("include_colors", d.include_colors)?,
                })
            }
            ExportFormat::Notion => {
                let d = NotionOptions::default();
                ExportOptions::Notion(NotionOptions {
                    page_title: reader.string("page_title", &d.page_title)?,
                    include_properties: reader
                        .boolean("include_properties", d.include_properties)?,
                })
            }
            ExportFormat::Confluence => {
                let d = ConfluenceOptions::default();
                ExportOptions::Confluence(ConfluenceOptions {
                    space_key: reader.string("space_key", &d.space_key)?,
                    include_macros: reader.boolean("include_macros", d.include_macros)?,
                })
            }
        };
        Ok(options)
    }
}

/// Typed accessors over the raw option object. Null counts as absent.
struct OptionReader<'a>(&'a Map<String, Value>);

impl OptionReader<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    fn invalid(key: &str, reason: impl Into<String>) -> ExportError {
        ExportError::InvalidOption {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    fn boolean(&self, key: &str, default: bool) -> Result<bool, ExportError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(Self::invalid(key, format!("expected a boolean, got {other}"))),
        }
    }

    fn string(&self, key: &str, default: &str) -> Result<String, ExportError> {
        match self.get(key) {
            None => Ok(default.to_string()),
            Some(Value::String(s)) => Ok(s.trim().to_string()),
            Some(other) => Err(Self::invalid(key, format!("expected a string, got {other}"))),
        }
    }

    fn positive(&self, key: &str, default: usize) -> Result<usize, ExportError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        match value.as_u64() {
            Some(0) => Err(Self::invalid(key, "must be at least 1")),
            Some(n) => usize::try_from(n).map_err(|_| Self::invalid(key, "value too large")),
            None => Err(Self::invalid(
                key,
                format!("expected a positive integer, got {value}"),
            )),
        }
    }

    fn choice<T: Copy>(&self, key: &str, choices: &[(&str, T)], default: T) -> Result<T, ExportError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        let Some(s) = value.as_str() else {
            return Err(Self::invalid(key, format!("expected a string, got {value}")));
        };
        let wanted = s.trim().to_lowercase();
        choices
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, v)| *v)
            .ok_or_else(|| {
                let names: Vec<&str> = choices.iter().map(|(name, _)| *name).collect();
                Self::invalid(key, format!("'{s}' is not one of {}", names.join(", ")))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(format: ExportFormat, raw: Value) -> Result<ExportOptions, ExportError> {
        let map = raw.as_object().cloned().unwrap_or_default();
        ExportOptions::parse(format, &map)
    }

    #[test]
    fn test_defaults_when_empty() {
        assert_eq!(
            parse(ExportFormat::Markdown, json!({})).unwrap(),
            ExportOptions::Markdown(MarkdownOptions::default())
        );
        assert_eq!(
            parse(ExportFormat::Mindmap, json!({})).unwrap(),
            ExportOptions::MindMap(MindMapOptions::default())
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let opts = parse(ExportFormat::Notion, json!({"theme": "dark", "page_title": " Retro "}));
        assert_eq!(
            opts.unwrap(),
            ExportOptions::Notion(NotionOptions {
                page_title: "Retro".into(),
                include_properties: true,
            })
        );
    }

    #[test]
    fn test_choice_is_case_insensitive() {
        let opts = parse(ExportFormat::Pptx, json!({"template": "Corporate", "slides_per_section": 3}));
        assert_eq!(
            opts.unwrap(),
            ExportOptions::Slides(SlideOptions {
                template: SlideTemplate::Corporate,
                slides_per_section: 3,
                include_notes: true,
            })
        );
    }

    #[test]
    fn test_null_means_default() {
        let opts = parse(ExportFormat::Markdown, json!({"table_format": null}));
        assert_eq!(opts.unwrap(), ExportOptions::Markdown(MarkdownOptions::default()));
    }

    #[test]
    fn test_rejects_wrong_type() {
        let err = parse(ExportFormat::Markdown, json!({"include_diagrams": "yes"})).unwrap_err();
        assert!(matches!(err, ExportError::InvalidOption { ref key, .. } if key == "include_diagrams"));
    }

    #[test]
    fn test_rejects_unknown_choice() {
        let err = parse(ExportFormat::Mindmap, json!({"format": "opml"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid option 'format': 'opml' is not one of json, xmind, freemind"
        );
    }

    #[test]
    fn test_rejects_zero_and_negative_depth() {
        assert!(parse(ExportFormat::Mindmap, json!({"max_depth": 0})).is_err());
        assert!(parse(ExportFormat::Mindmap, json!({"max_depth": -2})).is_err());
        assert!(parse(ExportFormat::Mindmap, json!({"max_depth": 2.5})).is_err());
        assert!(parse(ExportFormat::Pptx, json!({"slides_per_section": 0})).is_err());
    }

    #[test]
    fn test_mindmap_extensions() {
        assert_eq!(MindMapFormat::Json.extension(), "json");
        assert_eq!(MindMapFormat::Xmind.extension(), "xmind");
        assert_eq!(MindMapFormat::Freemind.extension(), "mm");
    }
}
