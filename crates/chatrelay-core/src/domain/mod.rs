//! Core domain types.
//!
//! These types represent the inbound chat request as the relay sees it,
//! independent of the HTTP framework that delivers it.
//!
//! # Structure
//!
//! - `chat` - Wire request, roles, turns and validation

pub mod chat;

pub use chat::{
    ChatRequest, ChatTurn, IncomingChatRequest, MISSING_FIELDS_MESSAGE, Role, parse_chat_request,
};
