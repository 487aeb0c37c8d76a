//! Dispatcher: route a classified event to the transport handler or the callback responder.

use crate::dialog::DialogAdapter;
use crate::router::callback::{respond_to_callback, DialogCallbackReply};
use crate::router::event::{InboundEvent, TransportRequest};
use crate::router::transport::{handle_transport, TransportResponse};
use serde::Serialize;

/// Result of dispatching one event; serializes to whichever shape the caller expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutboundResponse {
    Transport(TransportResponse),
    DialogCallback(DialogCallbackReply),
}

/// Stateless router over an injected dialog adapter. Cheap to clone and share.
#[derive(Clone)]
pub struct Dispatcher {
    adapter: DialogAdapter,
}

impl Dispatcher {
    pub fn new(adapter: DialogAdapter) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &DialogAdapter {
        &self.adapter
    }

    /// Route one classified event. Each call gets a fresh correlation id that tags its log lines.
    pub async fn dispatch(&self, event: InboundEvent) -> OutboundResponse {
        let request_id = next_request_id();
        log::info!("received event {} ({})", request_id, event.kind());
        let response = match event {
            InboundEvent::Transport(req) => OutboundResponse::Transport(
                handle_transport(&self.adapter, &req, Some(&request_id)).await,
            ),
            InboundEvent::DialogCallback(cb) => {
                log::debug!(
                    "event {}: dialog callback from {} for intent {:?}",
                    request_id,
                    cb.invocation_source,
                    cb.intent_name
                );
                OutboundResponse::DialogCallback(respond_to_callback(cb.intent_name.as_deref()))
            }
            InboundEvent::Unrecognized(raw) => {
                OutboundResponse::Transport(TransportResponse::diagnostic(&raw))
            }
        };
        if let OutboundResponse::Transport(ref t) = response {
            log::debug!("event {} answered with status {}", request_id, t.status_code);
        }
        response
    }

    /// Classify a raw event at the boundary and dispatch it.
    pub async fn dispatch_value(&self, raw: serde_json::Value) -> OutboundResponse {
        self.dispatch(InboundEvent::from_value(raw)).await
    }

    /// Transport-only entry point for callers that already know the event is a chat request.
    pub async fn dispatch_transport(&self, req: TransportRequest) -> TransportResponse {
        let request_id = next_request_id();
        log::info!("received event {} (transport {})", request_id, req.method);
        let response = handle_transport(&self.adapter, &req, Some(&request_id)).await;
        log::debug!("event {} answered with status {}", request_id, response.status_code);
        response
    }
}

fn next_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
