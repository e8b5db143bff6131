//! Rendering context: project metadata, clock and node ID source.
//!
//! Timestamps and mind-map IDs are the only non-deterministic parts of an
//! export, so both are injected.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use scribe_core::Project;
use scribe_core::model::non_empty;

/// Source of the generation timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Source of unique node identifiers.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `node-1`, `node-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("node-{n}")
    }
}

/// Title and description of the exported project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ProjectMeta {
    pub fn new(title: Option<String>, description: Option<String>) -> Self {
        Self { title, description }
    }

    /// Non-blank title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().and_then(non_empty)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().and_then(non_empty)
    }

    /// File name stem: the title (or "whiteboard") with unsafe characters replaced by `_`.
    pub fn file_stem(&self) -> String {
        self.title()
            .unwrap_or("whiteboard")
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '.' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl From<&Project> for ProjectMeta {
    fn from(project: &Project) -> Self {
        Self::new(project.title.clone(), project.description.clone())
    }
}

/// Everything a renderer needs besides the content and its options.
pub struct RenderContext<'a> {
    pub meta: &'a ProjectMeta,
    pub now: DateTime<Utc>,
    pub ids: &'a dyn IdSource,
}
