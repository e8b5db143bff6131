//! Vision model client.
//!
//! Sends a whiteboard photo to an OpenAI-compatible chat completions endpoint
//! (Doubao/Ark by default) and parses the JSON analysis out of the reply.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::VisionConfig;
use crate::error::AnalysisError;
use crate::model::{RawAnalysis, Section};

/// Confidence assigned when the reply was not valid JSON.
const FALLBACK_CONFIDENCE: f64 = 0.7;

const SYSTEM_PROMPT: &str = r#"You analyze photos of meeting whiteboards. Extract every piece of visible content and return only a JSON object of this shape:
{
  "title": "suggested meeting title",
  "sections": [{"heading": "", "content": "", "subsections": [], "type": "text|diagram|table"}],
  "tables": [{"title": "", "headers": [""], "rows": [[""]]}],
  "diagrams": [{"type": "flowchart|mindmap|drawing", "description": "", "elements": [""]}],
  "action_items": [{"task": "", "priority": "high|medium|low", "assignee": "name or null"}],
  "key_points": [""],
  "raw_text": "all extracted text",
  "confidence": 0.0
}
Keep the board's own wording, structure and list markers."#;

const USER_PROMPT: &str = "Analyze this whiteboard image and return the JSON described above. \
Pay attention to tables, action items and hierarchy.";

/// Something that can turn an image into a raw analysis.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<RawAnalysis, AnalysisError>;
}

/// OpenAI-compatible vision client.
pub struct OpenAiVisionAnalyzer {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout_secs: u64,
}

impl OpenAiVisionAnalyzer {
    /// Create a client from configuration.
    ///
    /// Reads the API key from the environment variable named in `config.api_key_env`.
    pub fn new(config: &VisionConfig) -> Result<Self, AnalysisError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AnalysisError::AuthFailed {
                reason: format!("env var '{}' not set", config.api_key_env),
            })?;
        Self::new_with_key(config, api_key)
    }

    /// Create a client with an explicitly provided API key.
    pub fn new_with_key(config: &VisionConfig, api_key: String) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalysisError::Connection {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        })
    }

    fn request_body(&self, image: &[u8], mime_type: &str) -> Value {
        let mime = if mime_type.trim().is_empty() {
            "image/jpeg"
        } else {
            mime_type
        };
        let data_url = format!("data:{};base64,{}", mime, STANDARD.encode(image));

        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": USER_PROMPT },
                        { "type": "image_url", "image_url": { "url": data_url } }
                    ]
                }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        })
    }

    fn map_http_error(status: reqwest::StatusCode, body: &str) -> AnalysisError {
        match status.as_u16() {
            401 | 403 => {
                debug!(body = %body, "Authentication failed");
                AnalysisError::AuthFailed {
                    reason: format!("HTTP {}", status),
                }
            }
            429 => AnalysisError::RateLimited {
                retry_after_secs: 5,
            },
            code if code >= 500 => AnalysisError::ApiRequest {
                message: format!("Server error ({}): {}", status, body),
                retryable: true,
            },
            _ => AnalysisError::ApiRequest {
                message: format!("HTTP {}: {}", status, body),
                retryable: false,
            },
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            AnalysisError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else if err.is_connect() {
            AnalysisError::Connection {
                message: err.to_string(),
            }
        } else {
            AnalysisError::ApiRequest {
                message: format!("Request failed: {}", err),
                retryable: false,
            }
        }
    }
}

/// Pull the assistant text out of a chat completions response.
fn reply_text(response: &Value) -> Result<&str, AnalysisError> {
    response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| AnalysisError::ResponseParse {
            message: "response has no choices[0].message.content".to_string(),
        })
}

/// The body of a ```json fence if present, otherwise the trimmed reply.
fn json_block(reply: &str) -> &str {
    const FENCE: &str = "```json";
    match reply.find(FENCE) {
        Some(start) => {
            let body = &reply[start + FENCE.len()..];
            let end = body.find("```").unwrap_or(body.len());
            body[..end].trim()
        }
        None => reply.trim(),
    }
}

/// Parse the model's reply into a raw analysis.
///
/// Whatever parses is kept, even when some fields are mistyped. Replies that
/// are not JSON at all become a single "Content" section holding the text.
pub fn parse_reply(reply: &str) -> RawAnalysis {
    match RawAnalysis::from_json(json_block(reply)) {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!(error = %e, "Vision reply was not valid JSON, keeping it as plain text");
            RawAnalysis {
                title: "Whiteboard Analysis".to_string(),
                sections: vec![Section::new("Content", reply)],
                raw_text: reply.to_string(),
                confidence: Some(FALLBACK_CONFIDENCE),
                ..Default::default()
            }
        }
    }
}

#[async_trait]
impl ImageAnalyzer for OpenAiVisionAnalyzer {
    async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<RawAnalysis, AnalysisError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(image, mime_type);

        debug!(url = %url, model = %self.model, bytes = image.len(), "Sending whiteboard to vision model");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(Self::map_http_error(status, &response_body));
        }

        let json: Value =
            serde_json::from_str(&response_body).map_err(|e| AnalysisError::ResponseParse {
                message: format!("Invalid JSON: {}", e),
            })?;

        Ok(parse_reply(reply_text(&json)?))
    }
}
