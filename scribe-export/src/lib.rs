//! Scribe Export: renders structured whiteboard content into documents.
//!
//! Five formats are supported: Markdown, PowerPoint slides, mind maps (JSON,
//! XMind-style JSON or FreeMind XML), Notion-flavored Markdown and Confluence
//! wiki markup. [`Exporter`] is the entry point; [`format_catalog`] describes
//! the formats and their options.

pub mod context;
pub mod error;
pub mod exporter;
pub mod format;
pub mod options;
pub mod record;
pub mod render;

pub use context::{Clock, FixedClock, IdSource, ProjectMeta, SequentialIds, SystemClock, UuidIds};
pub use error::ExportError;
pub use exporter::{ExportArtifact, Exporter};
pub use format::{ExportFormat, FormatInfo, format_catalog};
pub use options::ExportOptions;
pub use record::{ExportRecord, ExportStatus};
