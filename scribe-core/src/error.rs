//! Error types for the Scribe core library.
//!
//! Structuring itself never fails; these cover the vision collaborator, the
//! artifact store, configuration and the whiteboard lifecycle.

use std::path::PathBuf;

/// Top-level error type for the Scribe core library.
#[derive(Debug, thiserror::Error)]
pub enum ScribeError {
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Whiteboard error: {0}")]
    Whiteboard(#[from] WhiteboardError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the external vision model.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String, retryable: bool },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Authentication failed for vision provider: {reason}")]
    AuthFailed { reason: String },

    #[error("Rate limited by vision provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Analysis timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Vision provider connection failed: {message}")]
    Connection { message: String },
}

impl AnalysisError {
    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        match self {
            AnalysisError::ApiRequest { retryable, .. } => *retryable,
            AnalysisError::RateLimited { .. }
            | AnalysisError::Timeout { .. }
            | AnalysisError::Connection { .. } => true,
            AnalysisError::ResponseParse { .. } | AnalysisError::AuthFailed { .. } => false,
        }
    }
}

/// Errors from the artifact store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Artifact not found: {locator}")]
    NotFound { locator: String },

    #[error("Invalid artifact name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Storage IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {message}")]
    Load { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

impl From<Box<figment::Error>> for ConfigError {
    fn from(err: Box<figment::Error>) -> Self {
        ConfigError::Load {
            message: err.to_string(),
        }
    }
}

/// Errors from the whiteboard processing lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum WhiteboardError {
    #[error("Whiteboard {id} is already being processed")]
    AlreadyProcessing { id: String },

    #[error("Whiteboard {id} not found")]
    NotFound { id: String },

    #[error("Whiteboard {id} has no processed content")]
    NotCompleted { id: String },
}

/// Convenience result alias for the core crate.
pub type Result<T> = std::result::Result<T, ScribeError>;
