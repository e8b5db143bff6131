//! Notion-flavored Markdown: properties block, callouts and a database-style
//! action item table.

use scribe_core::StructuredContent;
use scribe_core::model::non_empty;

use super::{escape_cell, heading};
use crate::context::RenderContext;
use crate::options::NotionOptions;

pub fn render(contents: &[StructuredContent], opts: &NotionOptions, ctx: &RenderContext) -> String {
    let mut lines: Vec<String> = Vec::new();

    let page_title = non_empty(&opts.page_title).or(ctx.meta.title()).unwrap_or_default();
    lines.push(format!("# {}", heading(page_title, "Meeting Notes")));
    lines.push(String::new());

    if opts.include_properties {
        lines.push("**Properties:**".into());
        lines.push(format!("- Date: {}", ctx.now.format("%Y-%m-%d")));
        lines.push("- Type: Meeting Notes".into());
        lines.push("- Status: Complete".into());
        lines.push(String::new());
    }

    for content in contents {
        if !content.key_points.is_empty() {
            lines.push("> 💡 **Key Takeaways**".into());
            for point in content.key_points.iter().take(3) {
                lines.push(format!("> {point}"));
            }
            lines.push(String::new());
        }

        for section in &content.sections {
            lines.push(format!("## {}", heading(&section.heading, "Section")));
            lines.push(String::new());
            if !section.content.is_empty() {
                lines.push(section.content.clone());
            }
            lines.push(String::new());
        }

        if !content.action_items.is_empty() {
            lines.push("## 📋 Action Items".into());
            lines.push(String::new());
            lines.push("| Task | Priority | Assignee | Status |".into());
            lines.push("|------|----------|----------|--------|".into());
            for item in &content.action_items {
                let assignee = item.assignee.as_deref().unwrap_or("Unassigned");
                lines.push(format!(
                    "| {} | {} | {} | To Do |",
                    escape_cell(&item.task),
                    item.priority.label(),
                    escape_cell(assignee)
                ));
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
    use scribe_core::{ActionItem, Category, Effort, Priority, Section};

    fn render_with(contents: &[StructuredContent], meta: &ProjectMeta, opts: &NotionOptions) -> String {
        let ids = SequentialIds::new();
        let ctx = RenderContext {
            meta,
            now: Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap(),
            ids: &ids,
        };
        render(contents, opts, &ctx)
    }

    fn sample() -> StructuredContent {
        StructuredContent {
            sections: vec![Section::new("Goals", "Reduce churn")],
            action_items: vec![
                ActionItem {
                    task: "Send report".into(),
                    priority: Priority::High,
                    assignee: Some("Ana".into()),
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
            key_points: vec!["One".into(), "Two".into(), "Three".into(), "Four".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_full_page() {
        let meta = ProjectMeta::new(Some("Growth sync".into()), None);
        let out = render_with(&[sample()], &meta, &NotionOptions::default());
        let expected = "\
# Growth sync

**Properties:**
- Date: 2024-05-06
- Type: Meeting Notes
- Status: Complete

> 💡 **Key Takeaways**
> One
> Two
> Three

## Goals

Reduce churn

## 📋 Action Items

| Task | Priority | Assignee | Status |
|------|----------|----------|--------|
| Send report | High | Ana | To Do |
| Draft survey | Low | Unassigned | To Do |
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_page_title_option_and_no_properties() {
        let opts = NotionOptions {
            page_title: "Custom".into(),
            include_properties: false,
        };
        let meta = ProjectMeta::new(Some("Growth sync".into()), None);
        let out = render_with(&[StructuredContent::default()], &meta, &opts);
        assert_eq!(out, "# Custom\n");
    }

    #[test]
    fn test_default_title() {
        let out = render_with(
            &[StructuredContent::default()],
            &ProjectMeta::default(),
            &NotionOptions::default(),
        );
        assert!(out.starts_with("# Meeting Notes\n"));
    }
}
