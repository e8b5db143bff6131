//! Slide deck model. The deck is built as plain data first and packaged as
//! PowerPoint by [`super::pptx`].

use scribe_core::text::or_default;
use scribe_core::StructuredContent;

use super::priority_color;
use crate::context::RenderContext;
use crate::options::SlideOptions;

/// Characters of section content per slide.
pub const SLIDE_CHARS: usize = 500;

/// One paragraph of slide body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    /// RGB hex override; the template's body color when `None`.
    pub color: Option<&'static str>,
}

impl Paragraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: Vec<Paragraph>,
}

impl Slide {
    fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            body: Vec::new(),
        }
    }

    fn with_text(title: impl Into<String>, text: &str) -> Self {
        let mut slide = Self::titled(title);
        slide.body = text.lines().map(Paragraph::plain).collect();
        slide
    }
}

/// Build the ordered slides for all contents.
pub fn build_deck(contents: &[StructuredContent], opts: &SlideOptions, ctx: &RenderContext) -> Vec<Slide> {
    let mut deck = Vec::new();

    let mut title_slide = Slide::titled(ctx.meta.title().unwrap_or("Meeting Whiteboard Notes"));
    title_slide.subtitle = Some(format!("Generated on {}", ctx.now.format("%B %d, %Y")));
    deck.push(title_slide);

    for (i, content) in contents.iter().enumerate() {
        if contents.len() > 1 {
            let fallback = format!("Whiteboard {} Content", i + 1);
            deck.push(Slide::with_text(
                format!("Whiteboard {}", i + 1),
                content.title().unwrap_or(&fallback),
            ));
        }

        for section in &content.sections {
            let heading = or_default(&section.heading, "Section");
            for (page, text) in paginate(&section.content, opts.slides_per_section)
                .into_iter()
                .enumerate()
            {
                let title = if page == 0 {
                    heading.to_string()
                } else {
                    format!("{heading} (cont.)")
                };
                deck.push(Slide::with_text(title, &text));
            }
        }

        if !content.action_items.is_empty() {
            let mut slide = Slide::titled("Action Items");
            slide.body = content
                .action_items
                .iter()
                .map(|item| {
                    let mut text = format!("• {}", item.task);
                    if let Some(assignee) = &item.assignee {
                        text.push_str(&format!(" ({assignee})"));
                    }
                    Paragraph {
                        text,
                        color: Some(priority_color(item.priority)),
                    }
                })
                .collect();
            deck.push(slide);
        }

        for table in &content.tables {
            if table.headers.is_empty() || table.rows.is_empty() {
                continue;
            }
            let mut slide = Slide::titled(or_default(&table.title, "Table"));
            slide.body.push(Paragraph::plain("Table Content:"));
            for row in std::iter::once(&table.headers).chain(&table.rows) {
                slide.body.push(Paragraph::plain(row.join(" | ")));
            }
            deck.push(slide);
        }
    }

    deck
}

/// Split text into at most `max_pages` chunks of [`SLIDE_CHARS`] characters.
/// The last page is truncated with an ellipsis when text remains.
fn paginate(text: &str, max_pages: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= SLIDE_CHARS {
        return vec![text.to_string()];
    }

    let mut pages: Vec<String> = chars
        .chunks(SLIDE_CHARS)
        .take(max_pages.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect();
    let shown = SLIDE_CHARS * pages.len();
    if chars.len() > shown {
        if let Some(last) = pages.last_mut() {
            last.push_str("...");
        }
    }
    pages
}

/// Flattened text of a slide, used for previews and tests.
pub fn slide_text(slide: &Slide) -> String {
    let mut parts = vec![slide.title.clone()];
    parts.extend(slide.subtitle.clone());
    parts.extend(slide.body.iter().map(|p| p.text.clone()));
    parts.join("\n")
}
