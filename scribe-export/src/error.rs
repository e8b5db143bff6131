//! Error types for the export crate.

use thiserror::Error;

use crate::format::ExportFormat;

/// Errors from rendering an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no processed content to export")]
    NoContent,
    #[error("unsupported export format '{0}'")]
    UnsupportedFormat(String),
    #[error("invalid option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },
    #[error("{format} export failed: {message}")]
    RenderFailed {
        format: ExportFormat,
        message: String,
    },
    #[error("storage error: {0}")]
    Storage(#[from] scribe_core::StorageError),
}

impl ExportError {
    pub(crate) fn render(format: ExportFormat, err: impl std::fmt::Display) -> Self {
        ExportError::RenderFailed {
            format,
            message: err.to_string(),
        }
    }
}
