//! Main CLI parser.
//!
//! Every option can also come from the environment (or a `.env` file loaded
//! before parsing).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use chatrelay_core::{
    ConfigError, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_UPSTREAM_URL, RelayConfig,
};
use clap::Parser;

/// Default listen address.
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8787;

/// Command-line interface for the chat relay server.
#[derive(Parser, Debug)]
#[command(name = "chatrelay")]
#[command(about = "Relay chat requests from the app to the upstream LLM provider")]
#[command(version)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "CHATRELAY_HOST", default_value_t = DEFAULT_HOST)]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short = 'p', long, env = "CHATRELAY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Upstream provider API key
    #[arg(long = "api-key", env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the upstream provider
    #[arg(long = "upstream-url", env = "CHATRELAY_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Model identifier sent upstream
    #[arg(long, env = "CHATRELAY_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Ceiling on generated tokens per reply
    #[arg(long = "max-tokens", env = "CHATRELAY_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Upstream connect timeout in seconds
    #[arg(
        long = "connect-timeout",
        env = "CHATRELAY_CONNECT_TIMEOUT",
        default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS
    )]
    pub connect_timeout: u64,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Socket address to bind.
    pub const fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Build and validate the relay config from the parsed options.
    pub fn relay_config(&self) -> Result<RelayConfig, ConfigError> {
        let mut config = RelayConfig::default()
            .with_upstream_url(self.upstream_url.as_str())
            .with_model(self.model.as_str())
            .with_max_tokens(self.max_tokens)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout));

        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.as_str());
        }

        config.validate()?;
        Ok(config)
    }
}
