//! Inbound event shapes, parsed once at the boundary from raw JSON.

use serde_json::Value;

/// HTTP-style request (API gateway proxy event).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: String,
    pub raw_body: Option<String>,
    pub is_base64_encoded: bool,
}

impl TransportRequest {
    /// POST with a plain-text JSON body.
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            method: "POST".to_string(),
            raw_body: Some(body.into()),
            is_base64_encoded: false,
        }
    }
}

/// Direct invocation by the dialog engine's code hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogCallback {
    pub intent_name: Option<String>,
    pub invocation_source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Transport(TransportRequest),
    DialogCallback(DialogCallback),
    /// Neither a method nor an invocation source; kept verbatim for the diagnostic reply.
    Unrecognized(Value),
}

impl InboundEvent {
    /// Classify a raw event. A method field wins over an invocation source.
    pub fn from_value(event: Value) -> Self {
        if let Some(method) = transport_method(&event) {
            return InboundEvent::Transport(TransportRequest {
                method,
                raw_body: raw_body(&event),
                is_base64_encoded: event
                    .get("isBase64Encoded")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            });
        }
        if let Some(source) = event.get("invocationSource").filter(|v| is_marker(v)) {
            let invocation_source = match source {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let intent_name = event
                .pointer("/sessionState/intent/name")
                .and_then(Value::as_str)
                .map(str::to_string);
            return InboundEvent::DialogCallback(DialogCallback {
                intent_name,
                invocation_source,
            });
        }
        InboundEvent::Unrecognized(event)
    }

    /// Short kind for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Transport(_) => "transport",
            InboundEvent::DialogCallback(_) => "dialog-callback",
            InboundEvent::Unrecognized(_) => "unrecognized",
        }
    }
}

/// `httpMethod` (REST payload) or `requestContext.http.method` (HTTP API payload); blank counts as absent.
fn transport_method(event: &Value) -> Option<String> {
    event
        .get("httpMethod")
        .and_then(Value::as_str)
        .or_else(|| {
            event
                .pointer("/requestContext/http/method")
                .and_then(Value::as_str)
        })
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// String bodies pass through; a structured body is re-serialized; null/absent is None.
fn raw_body(event: &Value) -> Option<String> {
    match event.get("body") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Truthiness of an invocation source marker.
fn is_marker(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rest_payload_is_transport() {
        let e = InboundEvent::from_value(json!({
            "httpMethod": "POST",
            "body": "{\"message\":\"hi\"}"
        }));
        assert_eq!(
            e,
            InboundEvent::Transport(TransportRequest::post("{\"message\":\"hi\"}"))
        );
    }

    #[test]
    fn http_api_payload_is_transport() {
        let e = InboundEvent::from_value(json!({
            "requestContext": {"http": {"method": "POST"}},
            "body": "e30=",
            "isBase64Encoded": true
        }));
        match e {
            InboundEvent::Transport(t) => {
                assert_eq!(t.method, "POST");
                assert_eq!(t.raw_body.as_deref(), Some("e30="));
                assert!(t.is_base64_encoded);
            }
            other => panic!("expected transport, got {:?}", other),
        }
    }

    #[test]
    fn transport_without_body() {
        match InboundEvent::from_value(json!({"httpMethod": "GET"})) {
            InboundEvent::Transport(t) => assert!(t.raw_body.is_none()),
            other => panic!("expected transport, got {:?}", other),
        }
    }

    #[test]
    fn object_body_is_reserialized() {
        match InboundEvent::from_value(json!({"httpMethod": "POST", "body": {"message": "x"}})) {
            InboundEvent::Transport(t) => {
                assert_eq!(t.raw_body.as_deref(), Some(r#"{"message":"x"}"#))
            }
            other => panic!("expected transport, got {:?}", other),
        }
    }

    #[test]
    fn invocation_source_is_dialog_callback() {
        let e = InboundEvent::from_value(json!({
            "invocationSource": "DialogCodeHook",
            "sessionState": {"intent": {"name": "CustomGreetingIntent"}}
        }));
        assert_eq!(
            e,
            InboundEvent::DialogCallback(DialogCallback {
                intent_name: Some("CustomGreetingIntent".to_string()),
                invocation_source: "DialogCodeHook".to_string(),
            })
        );
    }

    #[test]
    fn callback_without_intent() {
        match InboundEvent::from_value(json!({"invocationSource": "FulfillmentCodeHook"})) {
            InboundEvent::DialogCallback(c) => assert!(c.intent_name.is_none()),
            other => panic!("expected callback, got {:?}", other),
        }
    }

    #[test]
    fn method_wins_over_invocation_source() {
        let e = InboundEvent::from_value(json!({
            "httpMethod": "POST",
            "invocationSource": "DialogCodeHook"
        }));
        assert_eq!(e.kind(), "transport");
    }

    #[test]
    fn empty_markers_are_unrecognized() {
        for event in [
            json!({"body": "{\"message\":\"test\"}"}),
            json!({"httpMethod": "", "invocationSource": ""}),
            json!({"invocationSource": null}),
            json!({"invocationSource": false}),
            json!([1, 2, 3]),
        ] {
            let e = InboundEvent::from_value(event.clone());
            assert_eq!(e, InboundEvent::Unrecognized(event));
        }
    }
}
