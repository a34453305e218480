//! Relay configuration.
//!
//! Built once at startup and shared read-only by every request. The API key
//! is optional: a missing key is reported per request as a configuration
//! error and does not stop the server from starting.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Default upstream base URL.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.anthropic.com";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default ceiling on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Default TCP connect timeout for upstream calls, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Value of the `anthropic-version` header sent upstream.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Upstream API key. `Debug` and `Display` never print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key. Blank input yields `None`.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw key, for the outbound header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Errors from [`RelayConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_tokens must be greater than zero")]
    ZeroMaxTokens,

    #[error("model identifier cannot be empty")]
    EmptyModel,

    #[error("upstream URL must start with http:// or https://, got {0}")]
    InvalidUpstreamUrl(String),
}

/// Settings for the upstream relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Upstream API key. `None` makes every chat call fail with a configuration error.
    pub api_key: Option<ApiKey>,
    /// Base URL of the provider, without trailing `/v1/messages`.
    pub upstream_url: String,
    /// Model identifier sent upstream.
    pub model: String,
    /// Ceiling on generated tokens.
    pub max_tokens: u32,
    /// TCP connect timeout for upstream calls.
    pub connect_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl RelayConfig {
    /// Set the API key. Blank keys are treated as absent.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = ApiKey::new(key);
        self
    }

    /// Set the upstream base URL.
    #[must_use]
    pub fn with_upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_url = url.into();
        self
    }

    /// Set the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the max output tokens.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Full URL of the messages endpoint.
    #[must_use]
    pub fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.upstream_url.trim_end_matches('/'))
    }

    /// Check static settings. The API key is not checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens == 0 {
            return Err(ConfigError::ZeroMaxTokens);
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if !(self.upstream_url.starts_with("http://") || self.upstream_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidUpstreamUrl(self.upstream_url.clone()));
        }
        Ok(())
    }
}
