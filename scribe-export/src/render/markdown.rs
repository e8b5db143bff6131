//! Markdown export with GitHub or grid tables and task-list action items.

use scribe_core::text::or_default;
use scribe_core::{StructuredContent, Table};

use super::{escape_cell as cell, heading, priority_emoji};
use crate::context::RenderContext;
use crate::options::{MarkdownOptions, TableFormat};

/// Render all contents as one Markdown document.
pub fn render(contents: &[StructuredContent], opts: &MarkdownOptions, ctx: &RenderContext) -> String {
    let mut lines: Vec<String> = Vec::new();
    let meta = ctx.meta;

    lines.push(format!("# {}", heading(meta.title().unwrap_or_default(), "Meeting Whiteboard Notes")));
    lines.push(String::new());

    lines.push("## Meeting Information".into());
    lines.push(String::new());
    lines.push(format!("- **Date**: {}", ctx.now.format("%Y-%m-%d %H:%M")));
    lines.push(format!("- **Project**: {}", heading(meta.title().unwrap_or_default(), "Untitled")));
    if let Some(description) = meta.description() {
        lines.push(format!("- **Description**: {description}"));
    }
    lines.push(String::new());

    for (i, content) in contents.iter().enumerate() {
        if contents.len() > 1 {
            lines.push(format!("## Whiteboard {}", i + 1));
            lines.push(String::new());
        }
        push_content(&mut lines, content, opts);
    }

    lines.join("\n")
}

fn push_content(lines: &mut Vec<String>, content: &StructuredContent, opts: &MarkdownOptions) {
    for section in &content.sections {
        lines.push(format!("### {}", heading(&section.heading, "Section")));
        lines.push(String::new());
        if !section.content.is_empty() {
            lines.push(section.content.clone());
        }
        lines.push(String::new());

        for sub in &section.subsections {
            lines.push(format!("#### {}", heading(&sub.heading, "Subsection")));
            lines.push(String::new());
            if !sub.content.is_empty() {
                lines.push(sub.content.clone());
            }
            lines.push(String::new());
        }
    }

    if !content.tables.is_empty() {
        lines.push("### Tables".into());
        lines.push(String::new());
        for table in &content.tables {
            if !table.title.trim().is_empty() {
                lines.push(format!("#### {}", heading(&table.title, "Table")));
                lines.push(String::new());
            }
            if table.headers.is_empty() {
                continue;
            }
            match opts.table_format {
                TableFormat::Github => push_github_table(lines, table),
                TableFormat::Grid => push_grid_table(lines, table),
            }
            lines.push(String::new());
        }
    }

    if !content.action_items.is_empty() {
        lines.push("### Action Items".into());
        lines.push(String::new());
        for item in &content.action_items {
            let assignee = item
                .assignee
                .as_deref()
                .map(|a| format!(" (@{a})"))
                .unwrap_or_default();
            lines.push(format!(
                "- [ ] {} {}{}",
                priority_emoji(item.priority),
                item.task,
                assignee
            ));
        }
        lines.push(String::new());
    }

    if !content.key_points.is_empty() {
        lines.push("### Key Points".into());
        lines.push(String::new());
        for point in &content.key_points {
            lines.push(format!("- {point}"));
        }
        lines.push(String::new());
    }

    if opts.include_diagrams && !content.diagrams.is_empty() {
        lines.push("### Diagrams and Visuals".into());
        lines.push(String::new());
        for diagram in &content.diagrams {
            lines.push(format!("#### {}", diagram.diagram_type.label()));
            lines.push(String::new());
            lines.push(or_default(&diagram.description, "No description available").to_string());
            if !diagram.elements.is_empty() {
                lines.push(String::new());
                lines.push("**Elements:**".into());
                for element in &diagram.elements {
                    lines.push(format!("- {element}"));
                }
            }
            lines.push(String::new());
        }
    }
}

fn pipe_row<S: AsRef<str>>(cells: &[S]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| cell(c.as_ref())).collect();
    format!("| {} |", cells.join(" | "))
}

fn push_github_table(lines: &mut Vec<String>, table: &Table) {
    lines.push(pipe_row(&table.headers));
    lines.push(pipe_row(&vec!["---"; table.headers.len()]));
    for row in &table.rows {
        lines.push(pipe_row(row));
    }
}

fn push_grid_table(lines: &mut Vec<String>, table: &Table) {
    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.headers.len()))
        .max()
        .unwrap_or(0);
    let mut widths = vec![3usize; columns];
    for row in std::iter::once(&table.headers).chain(&table.rows) {
        for (i, c) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell(c).chars().count());
        }
    }

    let border = |fill: char| -> String {
        let parts: Vec<String> = widths
            .iter()
            .map(|w| fill.to_string().repeat(w + 2))
            .collect();
        format!("+{}+", parts.join("+"))
    };
    let row_line = |row: &[String]| -> String {
        let parts: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let c = cell(c);
                let pad = widths[i].saturating_sub(c.chars().count());
                format!(" {c}{} ", " ".repeat(pad))
            })
            .collect();
        format!("|{}|", parts.join("|"))
    };

    lines.push(border('-'));
    lines.push(row_line(&table.headers));
    lines.push(border('='));
    for row in &table.rows {
        lines.push(row_line(row));
        lines.push(border('-'));
    }
}
