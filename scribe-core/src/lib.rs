//! Scribe Core: turns whiteboard analyses into structured meeting content.
//!
//! - **Input:** [`RawAnalysis`], the loosely typed JSON returned by a vision model
//! - **Structuring:** task mining and enhancement, concept extraction, topic
//!   clustering, hierarchy, insights and statistics, combined into
//!   [`StructuredContent`] by [`structure_content`]
//! - **Collaborators:** the vision client ([`ImageAnalyzer`]), the whiteboard
//!   lifecycle and the artifact store

pub mod cluster;
pub mod concepts;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod insights;
pub mod model;
pub mod stats;
pub mod storage;
pub mod structurer;
pub mod tasks;
pub mod text;
pub mod vision;
pub mod whiteboard;

// Re-exports for convenience
pub use cluster::{Cluster, cluster_sections};
pub use config::{ScribeConfig, VisionConfig, load_config};
pub use error::{AnalysisError, Result, ScribeError, StorageError, WhiteboardError};
pub use hierarchy::{HierarchyNode, NodeType};
pub use insights::{Insights, MeetingType};
pub use model::{
    ActionItem, Category, Diagram, DiagramType, Effort, Priority, RawActionItem, RawAnalysis,
    Section, SectionType, Table,
};
pub use stats::Statistics;
pub use storage::{ArtifactStore, LocalStore};
pub use structurer::{StructuredContent, structure_content};
pub use tasks::extract_tasks;
pub use vision::{ImageAnalyzer, OpenAiVisionAnalyzer};
pub use whiteboard::{ProcessingStatus, Project, Whiteboard, WhiteboardProcessor};
