//! Dialog engine capability: recognize text for a session and return the engine's messages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Locale sent with every recognize request.
pub const LOCALE_ID: &str = "en_US";

#[derive(Debug, thiserror::Error)]
pub enum DialogEngineError {
    #[error("dialog engine not configured: {0}")]
    NotConfigured(String),
    #[error("invalid dialog engine request: {0}")]
    InvalidRequest(String),
    #[error("dialog engine request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("dialog engine api error: {0}")]
    Api(String),
    #[error("malformed dialog engine response: {0}")]
    Malformed(String),
    #[error("request signing failed: {0}")]
    Signing(String),
}

/// Recognize-text request: bot identity, session and the user's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeTextRequest {
    pub bot_id: String,
    pub bot_alias_id: String,
    pub locale_id: String,
    pub session_id: String,
    pub text: String,
}

/// One message returned by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Recognize-text response (subset: messages only).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognizeTextResponse {
    #[serde(default)]
    pub messages: Vec<EngineMessage>,
}

impl RecognizeTextResponse {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            messages: vec![EngineMessage {
                content: Some(text.into()),
                content_type: Some("PlainText".to_string()),
            }],
        }
    }
}

/// Remote intent resolution. Implementations must be shareable across requests.
#[async_trait]
pub trait DialogEngine: Send + Sync {
    /// Short name for health output and logs (e.g. "lex").
    fn name(&self) -> &str;

    async fn recognize_text(
        &self,
        request: &RecognizeTextRequest,
    ) -> Result<RecognizeTextResponse, DialogEngineError>;
}

/// Engine used when no bot is configured: every call fails with `NotConfigured`.
#[derive(Debug, Clone)]
pub struct OfflineEngine {
    reason: String,
}

impl OfflineEngine {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl DialogEngine for OfflineEngine {
    fn name(&self) -> &str {
        "offline"
    }

    async fn recognize_text(
        &self,
        _request: &RecognizeTextRequest,
    ) -> Result<RecognizeTextResponse, DialogEngineError> {
        Err(DialogEngineError::NotConfigured(self.reason.clone()))
    }
}
