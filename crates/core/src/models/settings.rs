use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TOKEN_KEY: &str = "token";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_API_BASE_URL: &str = "STOCK_PORTFOLIO_API_URL";
const ENV_TOKEN_KEY: &str = "STOCK_PORTFOLIO_TOKEN_KEY";
const ENV_TIMEOUT_SECS: &str = "STOCK_PORTFOLIO_TIMEOUT_SECS";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the remote service, without trailing slash.
    pub api_base_url: String,

    /// Name under which the bearer token is persisted.
    pub token_key: String,

    /// Per-request timeout (ignored on wasm32).
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientSettings {
    /// Defaults overridden by `STOCK_PORTFOLIO_*` environment variables.
    /// Empty or malformed values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            settings = settings.with_base_url(url);
        }
        if let Some(key) = lookup(ENV_TOKEN_KEY).filter(|v| !v.trim().is_empty()) {
            settings.token_key = key.trim().to_string();
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS).and_then(|v| v.trim().parse::<u64>().ok()) {
            if secs > 0 {
                settings.request_timeout_secs = secs;
            }
        }

        settings
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }
}
