//! Export facade: validates the request, runs the renderer and names the file.

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use scribe_core::{ArtifactStore, Project, StructuredContent};

use crate::context::{Clock, IdSource, ProjectMeta, RenderContext, SystemClock, UuidIds};
use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::options::ExportOptions;
use crate::record::ExportRecord;
use crate::render::{confluence, markdown, mindmap, notion, pptx, slides};

/// A rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Renders structured contents into any supported format.
pub struct Exporter {
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    /// Exporter using the wall clock and random node IDs.
    pub fn new() -> Self {
        Self::with_sources(Box::new(SystemClock), Box::new(UuidIds))
    }

    pub fn with_sources(clock: Box<dyn Clock>, ids: Box<dyn IdSource>) -> Self {
        Self { clock, ids }
    }

    /// Render `contents` as `format` (an identifier such as `"markdown"` or `"slides"`).
    pub fn export(
        &self,
        format: &str,
        contents: &[StructuredContent],
        meta: &ProjectMeta,
        options: &Map<String, Value>,
    ) -> Result<ExportArtifact, ExportError> {
        if contents.is_empty() {
            return Err(ExportError::NoContent);
        }
        let format: ExportFormat = format.parse()?;
        self.export_format(format, contents, meta, options)
    }

    pub fn export_format(
        &self,
        format: ExportFormat,
        contents: &[StructuredContent],
        meta: &ProjectMeta,
        options: &Map<String, Value>,
    ) -> Result<ExportArtifact, ExportError> {
        if contents.is_empty() {
            return Err(ExportError::NoContent);
        }
        let options = ExportOptions::parse(format, options)?;
        let ctx = RenderContext {
            meta,
            now: self.clock.now(),
            ids: self.ids.as_ref(),
        };
        debug!(format = %format, contents = contents.len(), "Rendering export");

        let (bytes, extension) = match catch_unwind(AssertUnwindSafe(|| render(&options, contents, &ctx))) {
            Ok(result) => result.map_err(|message| ExportError::render(format, message))?,
            Err(_) => return Err(ExportError::render(format, "renderer panicked")),
        };

        let filename = filename(format, meta, &ctx, extension);
        info!(format = %format, filename = %filename, bytes = bytes.len(), "Export rendered");
        Ok(ExportArtifact {
            format,
            filename,
            bytes,
        })
    }

    /// Export the completed whiteboards of a project.
    pub fn export_project(
        &self,
        format: &str,
        project: &Project,
        options: &Map<String, Value>,
    ) -> Result<ExportArtifact, ExportError> {
        self.export(format, &project.completed_contents(), &ProjectMeta::from(project), options)
    }

    /// Run the export described by `record`, persist the artifact and update the record.
    ///
    /// On failure the record is marked as errored and the error is returned.
    pub fn export_to_store(
        &self,
        record: &mut ExportRecord,
        contents: &[StructuredContent],
        meta: &ProjectMeta,
        store: &dyn ArtifactStore,
    ) -> Result<ExportArtifact, ExportError> {
        let result = self
            .export_format(record.format, contents, meta, &record.options)
            .and_then(|artifact| {
                let locator = store.store(&artifact.bytes, &artifact.filename)?;
                Ok((artifact, locator))
            });

        match result {
            Ok((artifact, locator)) => {
                record.mark_completed(&artifact.filename, locator, artifact.size() as u64);
                Ok(artifact)
            }
            Err(e) => {
                warn!(export_id = %record.id, format = %record.format, error = %e, "Export failed");
                record.mark_error(e.to_string());
                Err(e)
            }
        }
    }
}

fn render(
    options: &ExportOptions,
    contents: &[StructuredContent],
    ctx: &RenderContext,
) -> Result<(Vec<u8>, &'static str), String> {
    match options {
        ExportOptions::Markdown(opts) => Ok((markdown::render(contents, opts, ctx).into_bytes(), "md")),
        ExportOptions::Slides(opts) => {
            let deck = slides::build_deck(contents, opts, ctx);
            let title = ctx.meta.title().unwrap_or("Meeting Whiteboard Notes");
            let bytes = pptx::write_pptx(&deck, opts.template, title, ctx.now).map_err(|e| e.to_string())?;
            Ok((bytes, "pptx"))
        }
        ExportOptions::MindMap(opts) => {
            let map = mindmap::build_mindmap(contents, opts, ctx);
            let text = mindmap::serialize(&map, opts.format).map_err(|e| e.to_string())?;
            Ok((text.into_bytes(), opts.format.extension()))
        }
        ExportOptions::Notion(opts) => Ok((notion::render(contents, opts, ctx).into_bytes(), "md")),
        ExportOptions::Confluence(opts) => {
            Ok((confluence::render(contents, opts, ctx).into_bytes(), "txt"))
        }
    }
}

fn filename(format: ExportFormat, meta: &ProjectMeta, ctx: &RenderContext, extension: &str) -> String {
    let stem = meta.file_stem();
    let ts = ctx.now.format("%Y%m%d_%H%M%S");
    match format {
        ExportFormat::Notion => format!("{stem}_notion_{ts}.{extension}"),
        ExportFormat::Confluence => format!("{stem}_confluence_{ts}.{extension}"),
        _ => format!("{stem}_{ts}.{extension}"),
    }
}
