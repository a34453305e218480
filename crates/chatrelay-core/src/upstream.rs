//! Upstream wire types for the Anthropic Messages API.
//!
//! Only the fields the relay reads or writes are modelled. Unknown response
//! fields are ignored so additive upstream changes do not break parsing.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatTurn, Role};
use crate::error::RelayError;

/// A message in the upstream `messages` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamMessage {
    pub role: Role,
    pub content: String,
}

impl From<ChatTurn> for UpstreamMessage {
    fn from(turn: ChatTurn) -> Self {
        Self {
            role: turn.role,
            content: turn.content,
        }
    }
}

/// Body of `POST /v1/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<UpstreamMessage>,
    pub stream: bool,
}

impl UpstreamRequest {
    pub fn new(
        model: impl Into<String>,
        max_tokens: u32,
        system: String,
        messages: Vec<UpstreamMessage>,
        stream: bool,
    ) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            system,
            messages,
            stream,
        }
    }
}

/// A content block in a buffered completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Block type, e.g. "text".
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub block_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Buffered (non-streaming) completion body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

impl CompletionResponse {
    /// Parse a buffered completion body.
    pub fn from_slice(body: &[u8]) -> Result<Self, RelayError> {
        serde_json::from_slice(body).map_err(|e| {
            RelayError::InvalidUpstreamResponse(format!("completion body is not valid JSON: {e}"))
        })
    }

    /// Text of the first content block.
    ///
    /// Later blocks are ignored. A missing or empty `content` array, or a
    /// first block without `text`, is treated as upstream schema drift.
    pub fn into_reply(self) -> Result<String, RelayError> {
        let block_count = self.content.len();
        self.content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| {
                RelayError::InvalidUpstreamResponse(format!(
                    "no text in first content block ({block_count} blocks)"
                ))
            })
    }
}
