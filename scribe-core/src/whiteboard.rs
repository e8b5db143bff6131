//! Whiteboard processing lifecycle and projects.
//!
//! A whiteboard moves uploaded -> processing -> completed, or to error with the
//! failure message retained. Projects group whiteboards and feed the completed
//! ones to the exporters.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::VisionConfig;
use crate::error::{AnalysisError, ScribeError, WhiteboardError};
use crate::structurer::{StructuredContent, structure_content};
use crate::vision::ImageAnalyzer;

/// Processing state of a whiteboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    #[default]
    Uploaded,
    Processing,
    Completed,
    Error,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Uploaded => "uploaded",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable message for a progress percentage.
pub fn progress_message(progress: u8) -> &'static str {
    match progress {
        0..25 => "Preparing image for analysis...",
        25..50 => "Analyzing whiteboard content...",
        50..75 => "Extracting text and structures...",
        75..100 => "Finalizing results...",
        _ => "Analysis complete!",
    }
}

/// One uploaded whiteboard photo and what was derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Whiteboard {
    pub id: String,
    pub project_id: String,
    pub filename: String,
    pub mime_type: String,
    pub status: ProcessingStatus,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<StructuredContent>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl Whiteboard {
    pub fn new(
        project_id: impl Into<String>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
            status: ProcessingStatus::Uploaded,
            progress: 0,
            error_message: None,
            raw_text: String::new(),
            confidence: None,
            content: None,
            created_at: Utc::now(),
            processed_at: None,
        }
    }

    /// Move to `status`, optionally updating progress and the error message.
    pub fn update_status(
        &mut self,
        status: ProcessingStatus,
        progress: Option<u8>,
        error_message: Option<String>,
    ) {
        self.status = status;
        if let Some(progress) = progress {
            self.progress = progress.min(100);
        }
        if error_message.is_some() {
            self.error_message = error_message;
        }
        if status == ProcessingStatus::Completed {
            self.processed_at = Some(Utc::now());
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProcessingStatus::Completed && self.content.is_some()
    }

    /// The processed content, or an error if processing has not completed.
    pub fn structured_content(&self) -> Result<&StructuredContent, WhiteboardError> {
        match (&self.status, &self.content) {
            (ProcessingStatus::Completed, Some(content)) => Ok(content),
            _ => Err(WhiteboardError::NotCompleted {
                id: self.id.clone(),
            }),
        }
    }

    pub fn progress_message(&self) -> &'static str {
        progress_message(self.progress)
    }
}

/// A collection of whiteboards exported together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub whiteboards: Vec<Whiteboard>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(title: Option<String>, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.filter(|t| !t.trim().is_empty()),
            description,
            whiteboards: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Register a new upload and return its id.
    pub fn add_whiteboard(&mut self, filename: &str, mime_type: &str) -> String {
        let whiteboard = Whiteboard::new(&self.id, filename, mime_type);
        let id = whiteboard.id.clone();
        self.whiteboards.push(whiteboard);
        id
    }

    pub fn whiteboard(&self, id: &str) -> Option<&Whiteboard> {
        self.whiteboards.iter().find(|w| w.id == id)
    }

    pub fn whiteboard_mut(&mut self, id: &str) -> Option<&mut Whiteboard> {
        self.whiteboards.iter_mut().find(|w| w.id == id)
    }

    /// Content of every completed whiteboard, in upload order.
    pub fn completed_contents(&self) -> Vec<StructuredContent> {
        self.whiteboards
            .iter()
            .filter_map(|w| w.structured_content().ok())
            .cloned()
            .collect()
    }

    /// Give an untitled project the title found on a board.
    pub fn adopt_title(&mut self, content: &StructuredContent) {
        if self.title.is_none()
            && let Some(title) = content.title()
        {
            self.title = Some(title.to_string());
        }
    }
}

/// Runs the vision call and structuring for whiteboards.
pub struct WhiteboardProcessor {
    analyzer: Arc<dyn ImageAnalyzer>,
    timeout: Duration,
    default_confidence: f64,
}

impl WhiteboardProcessor {
    pub fn new(analyzer: Arc<dyn ImageAnalyzer>, config: &VisionConfig) -> Self {
        Self {
            analyzer,
            timeout: Duration::from_secs(config.timeout_secs),
            default_confidence: config.default_confidence,
        }
    }

    /// Analyze and structure one whiteboard image.
    ///
    /// On failure the whiteboard is left in the error state with the message
    /// retained, and the error is returned.
    pub async fn process(
        &self,
        whiteboard: &mut Whiteboard,
        image: &[u8],
    ) -> Result<StructuredContent, ScribeError> {
        if whiteboard.status == ProcessingStatus::Processing {
            return Err(WhiteboardError::AlreadyProcessing {
                id: whiteboard.id.clone(),
            }
            .into());
        }

        whiteboard.update_status(ProcessingStatus::Processing, Some(0), None);
        whiteboard.error_message = None;
        info!(whiteboard = %whiteboard.id, "Analyzing whiteboard");

        whiteboard.update_status(ProcessingStatus::Processing, Some(25), None);
        let mime_type = whiteboard.mime_type.clone();
        let outcome =
            tokio::time::timeout(self.timeout, self.analyzer.analyze(image, &mime_type)).await;
        let analysis = match outcome {
            Ok(Ok(analysis)) => analysis,
            Ok(Err(e)) => return Err(Self::fail(whiteboard, e)),
            Err(_) => {
                let e = AnalysisError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                };
                return Err(Self::fail(whiteboard, e));
            }
        };

        whiteboard.update_status(ProcessingStatus::Processing, Some(50), None);
        let content = structure_content(&analysis);

        whiteboard.update_status(ProcessingStatus::Processing, Some(75), None);
        whiteboard.raw_text = analysis.raw_text.clone();
        whiteboard.confidence = Some(analysis.confidence.unwrap_or(self.default_confidence));
        whiteboard.content = Some(content.clone());
        whiteboard.update_status(ProcessingStatus::Completed, Some(100), None);

        info!(
            whiteboard = %whiteboard.id,
            sections = content.sections.len(),
            action_items = content.action_items.len(),
            "Whiteboard analysis complete"
        );
        Ok(content)
    }

    /// Process a whiteboard that belongs to `project`, adopting its title if
    /// the project has none.
    pub async fn process_in_project(
        &self,
        project: &mut Project,
        whiteboard_id: &str,
        image: &[u8],
    ) -> Result<StructuredContent, ScribeError> {
        let whiteboard =
            project
                .whiteboard_mut(whiteboard_id)
                .ok_or_else(|| WhiteboardError::NotFound {
                    id: whiteboard_id.to_string(),
                })?;
        let content = self.process(whiteboard, image).await?;
        project.adopt_title(&content);
        Ok(content)
    }

    fn fail(whiteboard: &mut Whiteboard, err: AnalysisError) -> ScribeError {
        warn!(
            whiteboard = %whiteboard.id,
            error = %err,
            retryable = err.is_retryable(),
            "Whiteboard analysis failed"
        );
        whiteboard.update_status(ProcessingStatus::Error, Some(0), Some(err.to_string()));
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawActionItem, RawAnalysis};
    use async_trait::async_trait;

    struct FixedAnalyzer(RawAnalysis);

    #[async_trait]
    impl ImageAnalyzer for FixedAnalyzer {
        async fn analyze(&self, _image: &[u8], _mime: &str) -> Result<RawAnalysis, AnalysisError> {
            Ok(self.0.clone())
        }
    }

    struct FailingAnalyzer;

    #[async_trait]
    impl ImageAnalyzer for FailingAnalyzer {
        async fn analyze(&self, _image: &[u8], _mime: &str) -> Result<RawAnalysis, AnalysisError> {
            Err(AnalysisError::ApiRequest {
                message: "Server error (503)".into(),
                retryable: true,
            })
        }
    }

    struct SlowAnalyzer;

    #[async_trait]
    impl ImageAnalyzer for SlowAnalyzer {
        async fn analyze(&self, _image: &[u8], _mime: &str) -> Result<RawAnalysis, AnalysisError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(RawAnalysis::default())
        }
    }

    fn processor(analyzer: impl ImageAnalyzer + 'static, timeout_secs: u64) -> WhiteboardProcessor {
        let config = VisionConfig {
            timeout_secs,
            ..Default::default()
        };
        WhiteboardProcessor::new(Arc::new(analyzer), &config)
    }

    fn analysis() -> RawAnalysis {
        RawAnalysis {
            title: "Design Review".into(),
            action_items: vec![RawActionItem::new("Email the vendor today")],
            raw_text: "Design review notes".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_process_success() {
        let mut wb = Whiteboard::new("p1", "board.jpg", "image/jpeg");
        let content = processor(FixedAnalyzer(analysis()), 60)
            .process(&mut wb, b"jpeg")
            .await
            .unwrap();

        assert_eq!(content.title, "Design Review");
        assert_eq!(wb.status, ProcessingStatus::Completed);
        assert_eq!(wb.progress, 100);
        assert_eq!(wb.raw_text, "Design review notes");
        assert_eq!(wb.confidence, Some(0.85));
        assert!(wb.processed_at.is_some());
        assert!(wb.is_completed());
        assert_eq!(wb.progress_message(), "Analysis complete!");
    }

    #[tokio::test]
    async fn test_process_failure_marks_error() {
        let mut wb = Whiteboard::new("p1", "board.jpg", "image/jpeg");
        let err = processor(FailingAnalyzer, 60)
            .process(&mut wb, b"jpeg")
            .await
            .unwrap_err();

        assert!(matches!(err, ScribeError::Analysis(ref e) if e.is_retryable()));
        assert_eq!(wb.status, ProcessingStatus::Error);
        assert_eq!(wb.progress, 0);
        assert!(wb.error_message.as_deref().unwrap().contains("503"));
        assert!(wb.structured_content().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_process_timeout_is_retryable() {
        let mut wb = Whiteboard::new("p1", "board.jpg", "image/jpeg");
        let err = processor(SlowAnalyzer, 60)
            .process(&mut wb, b"jpeg")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ScribeError::Analysis(AnalysisError::Timeout { timeout_secs: 60 })
        ));
        assert_eq!(wb.status, ProcessingStatus::Error);
    }

    #[tokio::test]
    async fn test_rejects_concurrent_processing() {
        let mut wb = Whiteboard::new("p1", "board.jpg", "image/jpeg");
        wb.update_status(ProcessingStatus::Processing, Some(25), None);
        let err = processor(FixedAnalyzer(analysis()), 60)
            .process(&mut wb, b"jpeg")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ScribeError::Whiteboard(WhiteboardError::AlreadyProcessing { .. })
        ));
        assert_eq!(wb.progress, 25);
    }

    #[tokio::test]
    async fn test_project_adopts_title_and_lists_completed() {
        let mut project = Project::new(None, None);
        let first = project.add_whiteboard("a.jpg", "image/jpeg");
        project.add_whiteboard("b.jpg", "image/jpeg");

        processor(FixedAnalyzer(analysis()), 60)
            .process_in_project(&mut project, &first, b"jpeg")
            .await
            .unwrap();

        assert_eq!(project.title.as_deref(), Some("Design Review"));
        assert_eq!(project.completed_contents().len(), 1);
        assert!(project.whiteboard(&first).unwrap().is_completed());
    }

    #[tokio::test]
    async fn test_unknown_whiteboard() {
        let mut project = Project::new(Some("Kickoff".into()), None);
        let err = processor(FixedAnalyzer(analysis()), 60)
            .process_in_project(&mut project, "missing", b"jpeg")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ScribeError::Whiteboard(WhiteboardError::NotFound { .. })
        ));
        assert_eq!(project.title.as_deref(), Some("Kickoff"));
    }

    #[test]
    fn test_progress_messages() {
        assert_eq!(progress_message(0), "Preparing image for analysis...");
        assert_eq!(progress_message(25), "Analyzing whiteboard content...");
        assert_eq!(progress_message(60), "Extracting text and structures...");
        assert_eq!(progress_message(99), "Finalizing results...");
        assert_eq!(progress_message(100), "Analysis complete!");
    }
}
