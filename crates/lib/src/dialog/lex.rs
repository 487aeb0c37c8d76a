//! Lex V2 runtime client: RecognizeText over HTTPS with SigV4-signed requests.

use crate::config::{self, Config};
use crate::dialog::engine::{
    DialogEngine, DialogEngineError, RecognizeTextRequest, RecognizeTextResponse,
};
use crate::dialog::sigv4::{self, Credentials, SigningRequest};
use async_trait::async_trait;
use std::time::Duration;

const SIGNING_SERVICE: &str = "lex";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client for the Lex V2 runtime API.
#[derive(Clone)]
pub struct LexClient {
    base_url: String,
    region: String,
    credentials: Option<Credentials>,
    client: reqwest::Client,
}

/// Runtime endpoint for a region.
pub fn default_endpoint(region: &str) -> String {
    format!("https://runtime-v2-lex.{}.amazonaws.com", region)
}

/// Session ids that cannot be sent as a single path segment (URL parsing collapses dot segments).
fn check_session_id(session_id: &str) -> Result<(), DialogEngineError> {
    match session_id {
        "" | "." | ".." => Err(DialogEngineError::InvalidRequest(format!(
            "session id {:?} is not a usable path segment",
            session_id
        ))),
        _ => Ok(()),
    }
}

/// Request path for RecognizeText; each segment is percent-encoded.
pub fn recognize_text_path(request: &RecognizeTextRequest) -> String {
    format!(
        "/bots/{}/botAliases/{}/botLocales/{}/sessions/{}/text",
        sigv4::uri_encode(&request.bot_id, false),
        sigv4::uri_encode(&request.bot_alias_id, false),
        sigv4::uri_encode(&request.locale_id, false),
        sigv4::uri_encode(&request.session_id, false),
    )
}

impl LexClient {
    pub fn new(
        base_url: Option<String>,
        region: impl Into<String>,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Result<Self, DialogEngineError> {
        let region = region.into();
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| default_endpoint(&region));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            region,
            credentials,
            client,
        })
    }

    /// Build a client from config + environment (region, endpoint override, AWS credentials).
    pub fn from_config(config: &Config) -> Result<Self, DialogEngineError> {
        let timeout = Duration::from_secs(
            config
                .dialog
                .timeout_secs
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );
        Self::new(
            config::resolve_endpoint(config),
            config::resolve_region(config),
            Credentials::from_env(),
            timeout,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST .../sessions/{sessionId}/text with `{"text": ...}`.
    async fn post_recognize_text(
        &self,
        request: &RecognizeTextRequest,
    ) -> Result<RecognizeTextResponse, DialogEngineError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            DialogEngineError::NotConfigured("AWS credentials not set".to_string())
        })?;
        check_session_id(&request.session_id)?;
        let path = recognize_text_path(request);
        let url = reqwest::Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| DialogEngineError::NotConfigured(format!("invalid endpoint: {}", e)))?;
        let host = match (url.host_str(), url.port()) {
            (Some(h), Some(p)) => format!("{}:{}", h, p),
            (Some(h), None) => h.to_string(),
            (None, _) => {
                return Err(DialogEngineError::NotConfigured(format!(
                    "endpoint has no host: {}",
                    self.base_url
                )))
            }
        };
        let body = serde_json::to_vec(&serde_json::json!({ "text": request.text }))
            .map_err(|e| DialogEngineError::Malformed(e.to_string()))?;
        let signed = sigv4::sign(
            &SigningRequest {
                method: "POST",
                host: &host,
                path: url.path(),
                headers: &[("content-type", "application/json")],
                payload: &body,
            },
            credentials,
            &self.region,
            SIGNING_SERVICE,
            chrono::Utc::now(),
        )?;

        let mut req = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .header("x-amz-date", &signed.amz_date)
            .header("authorization", &signed.authorization);
        if let Some(ref token) = signed.security_token {
            req = req.header("x-amz-security-token", token);
        }
        let res = req.body(body).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(DialogEngineError::Api(format!("{} {}", status, body)));
        }
        let bytes = res.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| DialogEngineError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl DialogEngine for LexClient {
    fn name(&self) -> &str {
        "lex"
    }

    async fn recognize_text(
        &self,
        request: &RecognizeTextRequest,
    ) -> Result<RecognizeTextResponse, DialogEngineError> {
        self.post_recognize_text(request).await
    }
}
