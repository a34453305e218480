//! Upstream relay.
//!
//! Issues exactly one call to the provider's messages endpoint per inbound
//! request and maps the result onto [`RelayError`]. Nothing is retried.

use axum::http::{StatusCode, header};
use chatrelay_core::{
    ANTHROPIC_VERSION, ChatRequest, CompletionResponse, RelayError, UpstreamRequest,
    build_messages, build_system_prompt,
};
use tracing::{debug, error, info, warn};

use crate::state::RelayState;

/// Result of a successful upstream call.
#[derive(Debug)]
pub enum RelayOutcome {
    /// Buffered mode: the extracted completion text.
    Buffered { reply: String },
    /// Streaming mode: the open upstream response, body not yet read.
    Streaming(reqwest::Response),
}

/// Relay a validated chat request to the upstream provider.
///
/// The API key is checked before anything goes on the wire.
pub async fn relay(state: &RelayState, request: ChatRequest) -> Result<RelayOutcome, RelayError> {
    let config = &state.config;
    let api_key = config.api_key.as_ref().ok_or(RelayError::Configuration)?;

    let ChatRequest {
        history,
        data_pack,
        user_message,
        stream,
    } = request;

    let system = build_system_prompt(&data_pack);
    let messages = build_messages(history, user_message);
    let body = UpstreamRequest::new(
        config.model.as_str(),
        config.max_tokens,
        system,
        messages,
        stream,
    );

    let url = config.messages_url();
    debug!(
        upstream = %url,
        model = %body.model,
        messages = body.messages.len(),
        streaming = stream,
        "Calling upstream provider"
    );

    let response = state
        .client
        .post(&url)
        .header("x-api-key", api_key.expose())
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header(header::CONTENT_TYPE, "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| RelayError::Server(format!("request to {url} failed: {e}")))?;

    let response = check_status(response).await?;

    if stream {
        info!("Upstream stream opened");
        Ok(RelayOutcome::Streaming(response))
    } else {
        let reply = read_reply(response).await?;
        info!(reply_len = reply.len(), "Upstream completion received");
        Ok(RelayOutcome::Buffered { reply })
    }
}

/// Map a non-success upstream status onto the error taxonomy.
///
/// Error bodies are read so they can be logged; they never reach the caller.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RelayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.unwrap_or_default();
        warn!(retry_after = ?retry_after, body = %body, "Upstream rate limited the request");
        return Err(RelayError::RateLimited { retry_after });
    }

    let body = response.text().await.unwrap_or_default();
    error!(status = status.as_u16(), body = %body, "Upstream returned an error");
    Err(RelayError::Upstream {
        status: status.as_u16(),
        body,
    })
}

/// Read the whole buffered completion and pull out the first text block.
async fn read_reply(response: reqwest::Response) -> Result<String, RelayError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| RelayError::Server(format!("failed to read upstream body: {e}")))?;

    CompletionResponse::from_slice(&bytes)?.into_reply()
}
