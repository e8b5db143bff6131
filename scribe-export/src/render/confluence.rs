//! Confluence wiki markup.

use scribe_core::StructuredContent;
use scribe_core::model::non_empty;

use super::{escape_cell, heading};
use crate::context::RenderContext;
use crate::options::ConfluenceOptions;

pub fn render(contents: &[StructuredContent], opts: &ConfluenceOptions, ctx: &RenderContext) -> String {
    let mut lines: Vec<String> = Vec::new();
    let macros = opts.include_macros;
    let project = ctx.meta.title();

    lines.push(format!("h1. {}", heading(project.unwrap_or_default(), "Meeting Whiteboard Notes")));
    lines.push(String::new());

    if macros {
        lines.push("{info}".into());
    }
    lines.push(format!("*Generated:* {}", ctx.now.format("%Y-%m-%d %H:%M")));
    lines.push(format!("*Project:* {}", heading(project.unwrap_or_default(), "Untitled")));
    if let Some(space) = non_empty(&opts.space_key) {
        lines.push(format!("*Space:* {space}"));
    }
    if macros {
        lines.push("{info}".into());
    }
    lines.push(String::new());

    for content in contents {
        for section in &content.sections {
            lines.push(format!("h2. {}", heading(&section.heading, "Section")));
            lines.push(String::new());
            if !section.content.is_empty() {
                lines.push(section.content.clone());
            }
            lines.push(String::new());
        }

        for table in &content.tables {
            if !table.title.trim().is_empty() {
                lines.push(format!("h3. {}", heading(&table.title, "Table")));
                lines.push(String::new());
            }
            if table.headers.is_empty() {
                continue;
            }
            let headers: Vec<String> = table.headers.iter().map(|h| escape_cell(h)).collect();
            lines.push(format!("|| {} ||", headers.join(" || ")));
            for row in &table.rows {
                let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
                lines.push(format!("| {} |", cells.join(" | ")));
            }
            lines.push(String::new());
        }

        if !content.action_items.is_empty() {
            lines.push("h2. Action Items".into());
            lines.push(String::new());
            if macros {
                lines.push("{task-list}".into());
            }
            for item in &content.action_items {
                match &item.assignee {
                    Some(assignee) => lines.push(format!("* {} - [~{assignee}]", item.task)),
                    None => lines.push(format!("* {}", item.task)),
                }
            }
            if macros {
                lines.push("{task-list}".into());
            }
            lines.push(String::new());
        }

        if !content.key_points.is_empty() {
            if macros {
                lines.push("{note}".into());
            }
            lines.push("h3. Key Points".into());
            for point in &content.key_points {
                lines.push(format!("* {point}"));
            }
            if macros {
                lines.push("{note}".into());
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ProjectMeta, SequentialIds};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use scribe_core::{ActionItem, Category, Effort, Priority, Section, Table};

    fn render_with(contents: &[StructuredContent], meta: &ProjectMeta, opts: &ConfluenceOptions) -> String {
        let ids = SequentialIds::new();
        let ctx = RenderContext {
            meta,
            now: Utc.with_ymd_and_hms(2024, 5, 6, 9, 15, 0).unwrap(),
            ids: &ids,
        };
        render(contents, opts, &ctx)
    }

    fn sample() -> StructuredContent {
        StructuredContent {
            sections: vec![Section::new("Goals", "Reduce churn")],
            tables: vec![Table {
                title: "Owners".into(),
                headers: vec!["A".into(), "B".into()],
                rows: vec![vec!["x".into()]],
            }],
            action_items: vec![
                ActionItem {
                    task: "Send report".into(),
                    priority: Priority::High,
                    assignee: Some("ana".into()),
                    deadline: None,
                    category: Category::Communication,
                    effort: Effort::Low,
                },
                ActionItem {
                    task: "Draft survey".into(),
                    priority: Priority::Low,
                    assignee: None,
                    deadline: None,
                    category: Category::Research,
                    effort: Effort::Medium,
                },
            ],
            key_points: vec!["Ship v2".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_full_page_with_macros() {
        let meta = ProjectMeta::new(Some("Growth sync".into()), None);
        let opts = ConfluenceOptions {
            space_key: "ENG".into(),
            include_macros: true,
        };
        let out = render_with(&[sample()], &meta, &opts);
        let expected = "\
h1. Growth sync

{info}
*Generated:* 2024-05-06 09:15
*Project:* Growth sync
*Space:* ENG
{info}

h2. Goals

Reduce churn

h3. Owners

|| A || B ||
| x |

h2. Action Items

{task-list}
* Send report - [~ana]
* Draft survey
{task-list}

{note}
h3. Key Points
* Ship v2
{note}
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_multiline_headings_are_collapsed() {
        let content = StructuredContent {
            sections: vec![Section::new("Q3\n\nGoals", "Grow")],
            tables: vec![Table {
                title: "Owner\nmap".into(),
                headers: vec!["A".into()],
                rows: vec![],
            }],
            ..Default::default()
        };
        let out = render_with(&[content], &ProjectMeta::default(), &ConfluenceOptions::default());
        assert!(out.contains("\nh2. Q3 Goals\n"));
        assert!(out.contains("\nh3. Owner map\n"));
    }

    #[test]
    fn test_without_macros() {
        let out = render_with(
            &[sample()],
            &ProjectMeta::default(),
            &ConfluenceOptions {
                space_key: String::new(),
                include_macros: false,
            },
        );
        assert!(out.starts_with("h1. Meeting Whiteboard Notes\n\n*Generated:* 2024-05-06 09:15\n*Project:* Untitled\n\n"));
        assert!(!out.contains('{'));
        assert!(out.contains("h3. Key Points\n* Ship v2\n"));
        assert!(!out.contains("*Space:*"));
    }
}
