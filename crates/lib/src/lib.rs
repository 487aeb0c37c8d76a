//! Chatbot core library — event routing, dialog-engine adapter, keyword fallback, and the
//! HTTP gateway used by the CLI.

pub mod config;
pub mod dialog;
pub mod fallback;
pub mod gateway;
pub mod router;
