//! Event routing: classify the raw event, then answer it as a transport request or a dialog callback.

mod callback;
mod dispatch;
mod event;
mod transport;

pub use callback::{
    intent_reply, respond_to_callback, ContentType, DialogActionType, DialogCallbackReply,
    FulfillmentState,
};
pub use dispatch::{Dispatcher, OutboundResponse};
pub use event::{DialogCallback, InboundEvent, TransportRequest};
pub use transport::{
    handle_transport, standard_headers, ChatRequest, ChatRequestError, TransportResponse,
    DEFAULT_SESSION_ID,
};
