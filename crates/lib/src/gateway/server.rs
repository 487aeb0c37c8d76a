//! Gateway HTTP server: raw-event invoke, direct chat, and health on one port.

use crate::config::Config;
use crate::dialog::{self, DialogAdapter};
use crate::router::{Dispatcher, TransportRequest, TransportResponse};
use anyhow::{Context, Result};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Shared state for the gateway (config and the dispatcher).
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<Dispatcher>,
}

/// Routes for the gateway; exposed so tests can serve it on their own listener.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/invoke", post(invoke))
        .route("/chat", post(chat).options(chat_preflight))
        .with_state(state)
}

/// Run the gateway with the dialog engine built from config (offline when the bot is not configured).
pub async fn run_gateway(config: Config) -> Result<()> {
    let adapter = dialog::adapter_from_config(&config);
    serve(config, adapter).await
}

/// Run the gateway with the given adapter until SIGINT/SIGTERM.
pub async fn serve(config: Config, adapter: DialogAdapter) -> Result<()> {
    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let state = GatewayState {
        config: Arc::new(config),
        dispatcher: Arc::new(Dispatcher::new(adapter)),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET / returns a simple health JSON (for liveness checks).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.config.gateway.port,
        "dialogEngine": state.dispatcher.adapter().engine_name(),
    }))
}

/// POST /invoke — body is a raw event; replies with the dispatch result as JSON.
async fn invoke(State(state): State<GatewayState>, body: Bytes) -> Response {
    let raw: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("invoke: unparsable event: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("invalid event JSON: {}", e) })),
            )
                .into_response();
        }
    };
    Json(state.dispatcher.dispatch_value(raw).await).into_response()
}

/// POST /chat — body is a chat request; the HTTP response mirrors the transport envelope.
async fn chat(State(state): State<GatewayState>, body: Bytes) -> Response {
    let req = TransportRequest::post(String::from_utf8_lossy(&body));
    transport_into_response(state.dispatcher.dispatch_transport(req).await)
}

/// OPTIONS /chat — CORS preflight.
async fn chat_preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

fn transport_into_response(res: TransportResponse) -> Response {
    let status = StatusCode::from_u16(res.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = Response::new(Body::from(res.body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    for (name, value) in &res.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(n), Ok(v)) => {
                headers.insert(n, v);
            }
            _ => log::debug!("chat: skipping invalid response header {}", name),
        }
    }
    response
}
