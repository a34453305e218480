//! Response emitter.
//!
//! Turns a [`RelayOutcome`] into the HTTP response sent to the caller.
//! Error responses are rendered by [`crate::error::HttpError`].

use axum::{
    Json,
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::relay::RelayOutcome;

/// Buffered-mode success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub reply: String,
}

/// Build the caller response for a successful relay.
pub fn emit(outcome: RelayOutcome) -> Response {
    match outcome {
        RelayOutcome::Buffered { reply } => Json(ReplyEnvelope { reply }).into_response(),
        RelayOutcome::Streaming(upstream) => stream_passthrough(upstream),
    }
}

/// Pipe the upstream event stream to the caller unchanged.
///
/// Chunks are forwarded as they arrive. hyper only polls the body when the
/// caller's socket can take more data, so upstream reads follow the caller's
/// pace. Dropping the response (caller disconnect) drops the upstream stream
/// and closes that connection.
fn stream_passthrough(upstream: reqwest::Response) -> Response {
    let byte_stream = upstream
        .bytes_stream()
        .inspect_err(|e| warn!("Upstream stream failed mid-response: {e}"))
        .map_err(std::io::Error::other);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .header("x-accel-buffering", "no") // Disable nginx buffering
        .body(Body::from_stream(byte_stream))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
