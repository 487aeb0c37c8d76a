//! Dialog-callback responder: canned fulfillment reply keyed by intent name.

use crate::fallback::{GREETING_REPLY, HELP_REPLY, NOT_UNDERSTOOD_REPLY};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FulfillmentState {
    Fulfilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DialogActionType {
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentType {
    PlainText,
}

/// Reply to a dialog-engine code hook. Serializes to the engine's response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "CallbackResponse")]
pub struct DialogCallbackReply {
    pub intent_name: String,
    pub fulfillment_state: FulfillmentState,
    pub dialog_action_type: DialogActionType,
    pub content: String,
    pub content_type: ContentType,
}

/// Wire: `{sessionState:{dialogAction:{type}, intent:{name, state}}, messages:[{contentType, content}]}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResponse {
    pub session_state: CallbackSessionState,
    pub messages: Vec<CallbackMessage>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackSessionState {
    pub dialog_action: CallbackDialogAction,
    pub intent: CallbackIntent,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallbackDialogAction {
    #[serde(rename = "type")]
    pub typ: DialogActionType,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallbackIntent {
    pub name: String,
    pub state: FulfillmentState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackMessage {
    pub content_type: ContentType,
    pub content: String,
}

impl From<DialogCallbackReply> for CallbackResponse {
    fn from(reply: DialogCallbackReply) -> Self {
        Self {
            session_state: CallbackSessionState {
                dialog_action: CallbackDialogAction {
                    typ: reply.dialog_action_type,
                },
                intent: CallbackIntent {
                    name: reply.intent_name,
                    state: reply.fulfillment_state,
                },
            },
            messages: vec![CallbackMessage {
                content_type: reply.content_type,
                content: reply.content,
            }],
        }
    }
}

/// Canned text for an intent; unknown or absent intents get the generic reply.
pub fn intent_reply(intent_name: Option<&str>) -> &'static str {
    match intent_name {
        Some("GreetingIntent") | Some("CustomGreetingIntent") => GREETING_REPLY,
        Some("HelpIntent") | Some("CustomHelpIntent") => HELP_REPLY,
        _ => NOT_UNDERSTOOD_REPLY,
    }
}

/// Always closes the dialog and marks the intent fulfilled. Absent intent name is echoed as "".
pub fn respond_to_callback(intent_name: Option<&str>) -> DialogCallbackReply {
    DialogCallbackReply {
        intent_name: intent_name.unwrap_or_default().to_string(),
        fulfillment_state: FulfillmentState::Fulfilled,
        dialog_action_type: DialogActionType::Close,
        content: intent_reply(intent_name).to_string(),
        content_type: ContentType::PlainText,
    }
}
