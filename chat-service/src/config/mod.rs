use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Number of history entries replayed into each prompt.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Upstream call budget before the request degrades.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_DEGRADED_REPLY: &str = "LeoCore engine failed to respond.";

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub common: core_config::Config,
    pub upstream: UpstreamConfig,
    pub memory: MemoryConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// When false the mock provider answers instead of the remote API.
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Reply shown to the user when the upstream call fails.
    pub degraded_reply: String,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct MemoryConfig {
    pub history_window: usize,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl ChatConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let enabled = get_env("UPSTREAM_ENABLED", Some("true"), is_prod)?
            .parse()
            .unwrap_or(true);

        Ok(ChatConfig {
            common: common_config,
            upstream: UpstreamConfig {
                enabled,
                base_url: get_env(
                    "UPSTREAM_BASE_URL",
                    Some("https://api.openai.com/v1"),
                    is_prod,
                )?,
                // A key is only mandatory when we actually call out.
                api_key: get_env("UPSTREAM_API_KEY", (!enabled).then_some(""), is_prod)?,
                model: get_env("UPSTREAM_MODEL", Some("gpt-4o-mini"), is_prod)?,
                timeout_secs: get_env(
                    "UPSTREAM_TIMEOUT_SECS",
                    Some(&DEFAULT_UPSTREAM_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
                degraded_reply: get_env(
                    "UPSTREAM_DEGRADED_REPLY",
                    Some(DEFAULT_DEGRADED_REPLY),
                    is_prod,
                )?,
            },
            memory: MemoryConfig {
                history_window: get_env(
                    "CHAT_HISTORY_WINDOW",
                    Some(&DEFAULT_HISTORY_WINDOW.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_HISTORY_WINDOW),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some("*"),
                    is_prod,
                )?),
            },
        })
    }
}

/// Split a comma separated origin list. `*` alone means any origin.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
