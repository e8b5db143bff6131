//! Turns a raw vision analysis into canonical structured content.
//!
//! Structuring never fails. Each derived field is computed in its own guarded
//! step; if a step panics the field keeps its default value and a warning is
//! logged, so one bad heuristic cannot discard the rest of the analysis.

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cluster::{Cluster, cluster_sections};
use crate::concepts::extract_concepts;
use crate::hierarchy::{HierarchyNode, build_hierarchy};
use crate::insights::{Insights, generate_insights};
use crate::model::{ActionItem, Diagram, RawAnalysis, Section, Table, non_empty};
use crate::stats::{Statistics, compute_statistics};
use crate::tasks::enhance_all;

/// The canonical representation of one analyzed whiteboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredContent {
    pub title: String,
    pub sections: Vec<Section>,
    pub tables: Vec<Table>,
    pub diagrams: Vec<Diagram>,
    pub action_items: Vec<ActionItem>,
    pub key_points: Vec<String>,
    pub raw_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub hierarchy: HierarchyNode,
    pub concepts: Vec<String>,
    pub topics: Vec<Cluster>,
    pub insights: Insights,
    pub statistics: Statistics,
}

impl StructuredContent {
    /// The title, if the board had one.
    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Run one structuring step, falling back to the default value if it panics.
fn guarded<T: Default>(step: &'static str, f: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            warn!(step, "Structuring step failed, using default value");
            T::default()
        }
    }
}

/// Text the document concepts are computed over.
fn concept_text(raw: &RawAnalysis) -> String {
    let mut text = raw.raw_text.clone();
    for section in &raw.sections {
        text.push(' ');
        text.push_str(&section.content);
    }
    text
}

/// Structure a raw analysis.
pub fn structure_content(raw: &RawAnalysis) -> StructuredContent {
    let action_items = guarded("action_items", || enhance_all(&raw.action_items));
    let hierarchy = guarded("hierarchy", || {
        build_hierarchy(&raw.title, &raw.sections, &action_items, &raw.key_points)
    });
    let concepts = guarded("concepts", || extract_concepts(&concept_text(raw)));
    let topics = guarded("topics", || cluster_sections(&raw.sections));
    let insights = guarded("insights", || {
        generate_insights(&raw.raw_text, &concepts, &action_items)
    });
    let statistics = guarded("statistics", || {
        compute_statistics(
            &raw.sections,
            &action_items,
            &raw.key_points,
            &raw.tables,
            &raw.diagrams,
            &raw.raw_text,
        )
    });

    debug!(
        sections = raw.sections.len(),
        action_items = action_items.len(),
        concepts = concepts.len(),
        meeting_type = %insights.meeting_type,
        "Structured whiteboard content"
    );

    StructuredContent {
        title: raw.title.clone(),
        sections: raw.sections.clone(),
        tables: raw.tables.clone(),
        diagrams: raw.diagrams.clone(),
        action_items,
        key_points: raw.key_points.clone(),
        raw_text: raw.raw_text.clone(),
        confidence: raw.confidence,
        hierarchy,
        concepts,
        topics,
        insights,
        statistics,
    }
}
