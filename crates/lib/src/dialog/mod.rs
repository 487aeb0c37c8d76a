//! Dialog engine: capability trait, Lex V2 runtime client, and the adapter that falls back to keywords.

mod adapter;
mod engine;
mod lex;
pub mod sigv4;

pub use adapter::{BotTarget, ChatReply, DialogAdapter};
pub use engine::{
    DialogEngine, DialogEngineError, EngineMessage, OfflineEngine, RecognizeTextRequest,
    RecognizeTextResponse, LOCALE_ID,
};
pub use lex::{default_endpoint, recognize_text_path, LexClient};

use crate::config::{self, Config};
use std::sync::Arc;

/// Build the adapter from config: Lex when bot id and alias are set (and the client builds), offline otherwise.
pub fn adapter_from_config(config: &Config) -> DialogAdapter {
    let bot_id = config::resolve_bot_id(config);
    let bot_alias_id = config::resolve_bot_alias_id(config);
    let (Some(bot_id), Some(bot_alias_id)) = (bot_id, bot_alias_id) else {
        log::warn!("BOT_ID or BOT_ALIAS_ID not set; replies will use the keyword fallback");
        return offline_adapter("bot id or alias not configured");
    };
    match LexClient::from_config(config) {
        Ok(client) => {
            log::info!("dialog engine: lex at {}", client.base_url());
            DialogAdapter::new(
                Arc::new(client),
                BotTarget {
                    bot_id,
                    bot_alias_id,
                },
            )
        }
        Err(e) => {
            log::warn!("building lex client failed, using keyword fallback: {}", e);
            offline_adapter("lex client unavailable")
        }
    }
}

/// Adapter whose engine always fails, so every reply comes from the keyword fallback.
pub fn offline_adapter(reason: &str) -> DialogAdapter {
    DialogAdapter::new(Arc::new(OfflineEngine::new(reason)), BotTarget::default())
}
