//! Chat request domain types.
//!
//! The mobile client posts a conversation, a free-text "data pack" describing
//! the user's current state, the newest user message and a streaming flag.
//! [`parse_chat_request`] turns the raw body into a validated [`ChatRequest`].

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Caller-visible message for a request without a user message or data pack.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: userMessage, dataPack";

/// The role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Convert role to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single prior turn of the conversation.
///
/// Any extra fields the client attaches to a history entry (ids, timestamps)
/// are dropped during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Request body as sent by the client, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingChatRequest {
    /// Prior conversation, oldest first.
    #[serde(default)]
    pub messages: Option<Vec<ChatTurn>>,
    /// Free-form summary of the user's current state.
    #[serde(default)]
    pub data_pack: Option<String>,
    /// The message being answered.
    #[serde(default)]
    pub user_message: Option<String>,
    /// Whether the caller wants the upstream event stream relayed as-is.
    #[serde(default)]
    pub stream: Option<bool>,
}

impl IncomingChatRequest {
    /// Check required fields and produce a [`ChatRequest`].
    ///
    /// Whitespace-only values count as missing.
    pub fn validate(self) -> Result<ChatRequest, RelayError> {
        let user_message = self.user_message.filter(|m| !m.trim().is_empty());
        let data_pack = self.data_pack.filter(|d| !d.trim().is_empty());

        let (Some(user_message), Some(data_pack)) = (user_message, data_pack) else {
            return Err(RelayError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        };

        Ok(ChatRequest {
            history: self.messages.unwrap_or_default(),
            data_pack,
            user_message,
            stream: self.stream.unwrap_or(false),
        })
    }
}

/// A validated chat request. Both `data_pack` and `user_message` are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub history: Vec<ChatTurn>,
    pub data_pack: String,
    pub user_message: String,
    pub stream: bool,
}

/// Parse and validate a raw request body.
///
/// An empty body is treated as an empty object, so it fails with the
/// missing-fields message rather than a parse error.
pub fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, RelayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return IncomingChatRequest::default().validate();
    }

    let incoming: IncomingChatRequest = serde_json::from_slice(body)
        .map_err(|e| RelayError::Validation(format!("Invalid request body: {e}")))?;

    incoming.validate()
}
