//! Transport handler: chat request parsing, validation, and the proxy response envelope.

use crate::dialog::{ChatReply, DialogAdapter};
use crate::router::event::TransportRequest;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const DEFAULT_SESSION_ID: &str = "default-session";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatRequestError {
    #[error("Message is required")]
    MissingMessage,
}

/// Validated chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

impl ChatRequest {
    /// Parse a raw body. Undecodable or non-object bodies count as `{}`; the message must be a non-empty string.
    /// A string `sessionId` is kept as sent (even empty); only a missing, null or non-string one gets the default.
    pub fn from_body(
        raw_body: Option<&str>,
        is_base64_encoded: bool,
    ) -> Result<Self, ChatRequestError> {
        let body = decode_body(raw_body, is_base64_encoded);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or(ChatRequestError::MissingMessage)?;
        let session_id = body
            .get("sessionId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());
        Ok(Self {
            message,
            session_id,
        })
    }
}

/// Body as a JSON object; anything malformed becomes an empty object.
fn decode_body(raw_body: Option<&str>, is_base64_encoded: bool) -> serde_json::Map<String, Value> {
    let Some(raw) = raw_body else {
        return serde_json::Map::new();
    };
    let text = if is_base64_encoded {
        match base64::engine::general_purpose::STANDARD
            .decode(raw.trim())
            .map_err(|e| e.to_string())
            .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()))
        {
            Ok(t) => t,
            Err(e) => {
                log::debug!("transport: undecodable base64 body treated as empty: {}", e);
                return serde_json::Map::new();
            }
        }
    } else {
        raw.to_string()
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            log::debug!("transport: non-object JSON body treated as empty");
            serde_json::Map::new()
        }
        Err(e) => {
            log::debug!("transport: malformed JSON body treated as empty: {}", e);
            serde_json::Map::new()
        }
    }
}

/// Proxy-integration response: status, headers, and a JSON-encoded body string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Headers carried by every transport response.
pub fn standard_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
    ])
}

impl TransportResponse {
    pub fn json(status_code: u16, body: &impl Serialize) -> Self {
        let body = serde_json::to_string(body)
            .unwrap_or_else(|_| r#"{"error":"response serialization failed"}"#.to_string());
        Self {
            status_code,
            headers: standard_headers(),
            body,
        }
    }

    pub fn ok(reply: &ChatReply) -> Self {
        Self::json(200, reply)
    }

    pub fn bad_request(error: &ChatRequestError) -> Self {
        Self::json(400, &json!({ "error": error.to_string() }))
    }

    /// Status 200 diagnostic for events of unknown shape; echoes the input.
    pub fn diagnostic(input: &Value) -> Self {
        Self::json(
            200,
            &json!({ "message": "Hello from smart chatbot!", "input": input }),
        )
    }

    /// Parsed body (test and CLI convenience).
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Validate, resolve through the adapter, and wrap in the envelope. Validation failures never reach the engine.
/// `request_id` only tags log lines.
pub async fn handle_transport(
    adapter: &DialogAdapter,
    req: &TransportRequest,
    request_id: Option<&str>,
) -> TransportResponse {
    let chat = match ChatRequest::from_body(req.raw_body.as_deref(), req.is_base64_encoded) {
        Ok(c) => c,
        Err(e) => {
            log::info!(
                "{}transport {}: rejected: {}",
                request_id.map(|id| format!("event {}: ", id)).unwrap_or_default(),
                req.method,
                e
            );
            return TransportResponse::bad_request(&e);
        }
    };
    let reply = adapter
        .resolve_for(request_id, &chat.message, &chat.session_id)
        .await;
    TransportResponse::ok(&reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{
        offline_adapter, BotTarget, DialogEngine, DialogEngineError, RecognizeTextRequest,
        RecognizeTextResponse,
    };
    use crate::fallback::{FAREWELL_REPLY, THANKS_REPLY};
    use async_trait::async_trait;
    use base64::Engine as _;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Echoes the text back and counts calls.
    #[derive(Default)]
    struct EchoEngine {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DialogEngine for EchoEngine {
        fn name(&self) -> &str {
            "echo"
        }

        async fn recognize_text(
            &self,
            request: &RecognizeTextRequest,
        ) -> Result<RecognizeTextResponse, DialogEngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RecognizeTextResponse::with_text(format!("echo: {}", request.text)))
        }
    }

    fn echo_adapter() -> (Arc<EchoEngine>, DialogAdapter) {
        let engine = Arc::new(EchoEngine::default());
        let adapter = DialogAdapter::new(engine.clone(), BotTarget::default());
        (engine, adapter)
    }

    #[test]
    fn parse_defaults_session() {
        let c = ChatRequest::from_body(Some(r#"{"message":"hi"}"#), false).unwrap();
        assert_eq!(c.session_id, DEFAULT_SESSION_ID);
        let c = ChatRequest::from_body(Some(r#"{"message":"hi","sessionId":null}"#), false).unwrap();
        assert_eq!(c.session_id, DEFAULT_SESSION_ID);
    }

    #[test]
    fn parse_keeps_explicit_empty_session() {
        let c = ChatRequest::from_body(Some(r#"{"message":"hi","sessionId":""}"#), false).unwrap();
        assert_eq!(c.session_id, "");
    }

    #[test]
    fn parse_rejects_missing_empty_and_non_string_message() {
        for body in [
            None,
            Some("{}"),
            Some(r#"{"message":""}"#),
            Some(r#"{"message":42}"#),
            Some("not json"),
            Some("[\"message\"]"),
        ] {
            assert_eq!(
                ChatRequest::from_body(body, false),
                Err(ChatRequestError::MissingMessage),
                "body: {:?}",
                body
            );
        }
    }

    #[test]
    fn parse_base64_body() {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(r#"{"message":"thanks","sessionId":"b64"}"#);
        let c = ChatRequest::from_body(Some(&encoded), true).unwrap();
        assert_eq!(c.message, "thanks");
        assert_eq!(c.session_id, "b64");
        assert_eq!(
            ChatRequest::from_body(Some("%%%"), true),
            Err(ChatRequestError::MissingMessage)
        );
    }

    #[tokio::test]
    async fn success_echoes_session_and_headers() {
        let (engine, adapter) = echo_adapter();
        let res = handle_transport(
            &adapter,
            &TransportRequest::post(r#"{"message":"order status","sessionId":"abc"}"#),
            None,
        )
        .await;
        assert_eq!(res.status_code, 200);
        assert_eq!(res.headers, standard_headers());
        let body = res.body_json().unwrap();
        assert_eq!(body["message"], "echo: order status");
        assert_eq!(body["sessionId"], "abc");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn validation_failure_never_calls_engine() {
        let (engine, adapter) = echo_adapter();
        for body in [r#"{"message":""}"#, r#"{"sessionId":"x"}"#, "{broken"] {
            let res = handle_transport(&adapter, &TransportRequest::post(body), None).await;
            assert_eq!(res.status_code, 400);
            assert_eq!(res.headers, standard_headers());
            assert_eq!(res.body_json().unwrap(), json!({"error": "Message is required"}));
        }
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn engine_failure_still_returns_fallback_with_200() {
        let adapter = offline_adapter("test");
        let res = handle_transport(
            &adapter,
            &TransportRequest::post(r#"{"message":"goodbye","sessionId":"s-9"}"#),
            Some("req-9"),
        )
        .await;
        assert_eq!(res.status_code, 200);
        let body = res.body_json().unwrap();
        assert_eq!(body["message"], FAREWELL_REPLY);
        assert_eq!(body["sessionId"], "s-9");

        let res = handle_transport(
            &adapter,
            &TransportRequest::post(r#"{"message":"thank you"}"#),
            None,
        )
        .await;
        let body = res.body_json().unwrap();
        assert_eq!(body["message"], THANKS_REPLY);
        assert_eq!(body["sessionId"], DEFAULT_SESSION_ID);
    }

    #[tokio::test]
    async fn explicit_empty_session_is_echoed() {
        let adapter = offline_adapter("test");
        let res = handle_transport(
            &adapter,
            &TransportRequest::post(r#"{"message":"goodbye","sessionId":""}"#),
            None,
        )
        .await;
        assert_eq!(res.status_code, 200);
        let body = res.body_json().unwrap();
        assert_eq!(body["message"], FAREWELL_REPLY);
        assert_eq!(body["sessionId"], "");
    }

    #[test]
    fn diagnostic_echoes_input() {
        let input = json!({"body": "{\"message\":\"test\"}"});
        let res = TransportResponse::diagnostic(&input);
        assert_eq!(res.status_code, 200);
        let body = res.body_json().unwrap();
        assert_eq!(body["message"], "Hello from smart chatbot!");
        assert_eq!(body["input"], input);
    }

    #[test]
    fn envelope_serializes_camel_case() {
        let res = TransportResponse::ok(&ChatReply {
            message: "m".to_string(),
            session_id: "s".to_string(),
        });
        let v = serde_json::to_value(&res).unwrap();
        assert_eq!(v["statusCode"], 200);
        assert_eq!(v["headers"]["Access-Control-Allow-Origin"], "*");
        assert_eq!(v["body"], r#"{"message":"m","sessionId":"s"}"#);
    }
}
