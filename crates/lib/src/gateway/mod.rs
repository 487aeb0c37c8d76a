//! Gateway: HTTP front for the dispatcher.
//!
//! Single port serves the raw-event invoke route (`POST /invoke`), the direct chat route
//! (`POST /chat`, with CORS preflight), and a health check (`GET /`).

mod server;

pub use server::{router, run_gateway, serve, GatewayState};
