//! Bookkeeping for generated exports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::format::ExportFormat;

/// State of an export job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    #[default]
    Generating,
    Completed,
    Error,
}

impl ExportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportStatus::Generating => "generating",
            ExportStatus::Completed => "completed",
            ExportStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested export and where its artifact ended up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub id: String,
    pub project_id: String,
    pub format: ExportFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Store locator of the artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub options: Map<String, Value>,
    pub status: ExportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub download_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_downloaded: Option<DateTime<Utc>>,
}

impl ExportRecord {
    pub fn new(project_id: impl Into<String>, format: ExportFormat, options: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.into(),
            format,
            filename: None,
            locator: None,
            file_size: None,
            options,
            status: ExportStatus::Generating,
            error_message: None,
            created_at: Utc::now(),
            completed_at: None,
            download_count: 0,
            last_downloaded: None,
        }
    }

    pub fn mark_completed(&mut self, filename: impl Into<String>, locator: impl Into<String>, file_size: u64) {
        self.status = ExportStatus::Completed;
        self.filename = Some(filename.into());
        self.locator = Some(locator.into());
        self.file_size = Some(file_size);
        self.error_message = None;
        self.completed_at = Some(Utc::now());
    }

    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.status = ExportStatus::Error;
        self.error_message = Some(message.into());
        self.completed_at = None;
    }

    pub fn mark_downloaded(&mut self) {
        self.download_count += 1;
        self.last_downloaded = Some(Utc::now());
    }

    pub fn is_downloadable(&self) -> bool {
        self.status == ExportStatus::Completed && self.locator.is_some()
    }
}
