//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.chatbot/config.json`) and environment.
//! Environment values override the file; blank values count as unset.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Region used for the dialog engine when neither AWS_REGION nor config sets one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Dialog engine (Lex V2 bot) settings.
    #[serde(default)]
    pub dialog: DialogEngineConfig,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for HTTP (default 8080).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    8080
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// Dialog engine bot identity and endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogEngineConfig {
    /// Bot id. Overridden by BOT_ID env.
    pub bot_id: Option<String>,
    /// Bot alias id. Overridden by BOT_ALIAS_ID env.
    pub bot_alias_id: Option<String>,
    /// AWS region. Overridden by AWS_REGION env; defaults to us-east-1.
    pub region: Option<String>,
    /// Runtime endpoint override (e.g. a VPC endpoint or local stub). Overridden by DIALOG_ENGINE_ENDPOINT env.
    pub endpoint: Option<String>,
    /// Request timeout in seconds for the dialog engine call (default 10).
    pub timeout_secs: Option<u64>,
}

/// Env value if set and not blank, otherwise the configured value if not blank.
fn env_or_config(env: Option<String>, configured: Option<&String>) -> Option<String> {
    env.and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
    .or_else(|| {
        configured
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Resolve the bot id: env BOT_ID overrides config.
pub fn resolve_bot_id(config: &Config) -> Option<String> {
    env_or_config(std::env::var("BOT_ID").ok(), config.dialog.bot_id.as_ref())
}

/// Resolve the bot alias id: env BOT_ALIAS_ID overrides config.
pub fn resolve_bot_alias_id(config: &Config) -> Option<String> {
    env_or_config(
        std::env::var("BOT_ALIAS_ID").ok(),
        config.dialog.bot_alias_id.as_ref(),
    )
}

/// Resolve the region: env AWS_REGION, then config, then [`DEFAULT_REGION`].
pub fn resolve_region(config: &Config) -> String {
    env_or_config(std::env::var("AWS_REGION").ok(), config.dialog.region.as_ref())
        .unwrap_or_else(|| DEFAULT_REGION.to_string())
}

/// Resolve the runtime endpoint override: env DIALOG_ENGINE_ENDPOINT overrides config.
pub fn resolve_endpoint(config: &Config) -> Option<String> {
    env_or_config(
        std::env::var("DIALOG_ENGINE_ENDPOINT").ok(),
        config.dialog.endpoint.as_ref(),
    )
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("CHATBOT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".chatbot").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, or the default path (or CHATBOT_CONFIG_PATH). Missing file => default config.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(default_config_path);
    if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        return Ok(Config::default());
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let config = serde_json::from_str(&s)
        .with_context(|| format!("parsing config from {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_gateway_port_and_bind() {
        let g = GatewayConfig::default();
        assert_eq!(g.port, 8080);
        assert_eq!(g.bind, "127.0.0.1");
    }

    #[test]
    fn env_value_overrides_config() {
        let configured = "from-config".to_string();
        assert_eq!(
            env_or_config(Some("from-env".to_string()), Some(&configured)),
            Some("from-env".to_string())
        );
    }

    #[test]
    fn blank_env_falls_back_to_config() {
        let configured = " bot-123 ".to_string();
        assert_eq!(
            env_or_config(Some("   ".to_string()), Some(&configured)),
            Some("bot-123".to_string())
        );
        assert_eq!(env_or_config(None, Some(&String::new())), None);
    }

    #[test]
    fn parses_camel_case_json() {
        let config: Config = serde_json::from_str(
            r#"{"gateway":{"port":9000},"dialog":{"botId":"B1","botAliasId":"A1","timeoutSecs":3}}"#,
        )
        .unwrap();
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.gateway.bind, "127.0.0.1");
        assert_eq!(config.dialog.bot_id.as_deref(), Some("B1"));
        assert_eq!(config.dialog.bot_alias_id.as_deref(), Some("A1"));
        assert_eq!(config.dialog.timeout_secs, Some(3));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!("chatbot-missing-{}.json", uuid::Uuid::new_v4()));
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.gateway.port, 8080);
        assert!(config.dialog.bot_id.is_none());
    }

    #[test]
    fn invalid_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("chatbot-bad-{}.json", uuid::Uuid::new_v4()));
        std::fs::File::create(&path)
            .and_then(|mut f| f.write_all(b"{not json"))
            .unwrap();
        assert!(load_config(Some(path.clone())).is_err());
        let _ = std::fs::remove_file(path);
    }
}
