#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod error;
pub mod prompt;
pub mod upstream;

// Re-export commonly used types for convenience
pub use config::{
    ANTHROPIC_VERSION, ApiKey, ConfigError, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_UPSTREAM_URL, RelayConfig,
};
pub use domain::{ChatRequest, ChatTurn, IncomingChatRequest, Role, parse_chat_request};
pub use error::{ErrorKind, RelayError};
pub use prompt::{build_messages, build_system_prompt};
pub use upstream::{CompletionResponse, ContentBlock, UpstreamMessage, UpstreamRequest};
