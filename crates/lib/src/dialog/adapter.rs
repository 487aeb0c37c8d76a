//! Dialog-engine adapter: resolve a chat message through the engine, degrading to the keyword fallback.

use crate::dialog::engine::{DialogEngine, DialogEngineError, RecognizeTextRequest, LOCALE_ID};
use crate::fallback::{fallback, NOT_UNDERSTOOD_REPLY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reply to a chat request; same shape whether it came from the engine or the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    pub session_id: String,
}

/// Bot the adapter talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotTarget {
    pub bot_id: String,
    pub bot_alias_id: String,
}

/// Wraps an injected dialog engine. The engine is a soft dependency: `resolve` never fails.
#[derive(Clone)]
pub struct DialogAdapter {
    engine: Arc<dyn DialogEngine>,
    bot: BotTarget,
}

impl DialogAdapter {
    pub fn new(engine: Arc<dyn DialogEngine>, bot: BotTarget) -> Self {
        Self { engine, bot }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Ask the engine. Empty message list => canned "didn't understand"; first entry without text => malformed.
    pub async fn try_resolve(
        &self,
        message: &str,
        session_id: &str,
    ) -> Result<ChatReply, DialogEngineError> {
        let request = RecognizeTextRequest {
            bot_id: self.bot.bot_id.clone(),
            bot_alias_id: self.bot.bot_alias_id.clone(),
            locale_id: LOCALE_ID.to_string(),
            session_id: session_id.to_string(),
            text: message.to_string(),
        };
        let response = self.engine.recognize_text(&request).await?;
        let text = match response.messages.first() {
            None => NOT_UNDERSTOOD_REPLY.to_string(),
            Some(first) => first.content.clone().ok_or_else(|| {
                DialogEngineError::Malformed("first message has no content".to_string())
            })?,
        };
        Ok(ChatReply {
            message: text,
            session_id: session_id.to_string(),
        })
    }

    /// Resolve through the engine; on any engine error, reply with the keyword fallback for the same message.
    pub async fn resolve(&self, message: &str, session_id: &str) -> ChatReply {
        self.resolve_for(None, message, session_id).await
    }

    /// `resolve`, tagging the fallback warning with the caller's request id.
    pub async fn resolve_for(
        &self,
        request_id: Option<&str>,
        message: &str,
        session_id: &str,
    ) -> ChatReply {
        match self.try_resolve(message, session_id).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!(
                    "{}dialog engine ({}) failed, using fallback reply: {}",
                    request_id.map(|id| format!("event {}: ", id)).unwrap_or_default(),
                    self.engine.name(),
                    e
                );
                ChatReply {
                    message: fallback(message).to_string(),
                    session_id: session_id.to_string(),
                }
            }
        }
    }
}
