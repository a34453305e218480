//! Request gate: CORS preflight, per-request tracing span and body validation.
//!
//! The CORS headers themselves are stamped on every response by the
//! `SetResponseHeaderLayer`s in [`crate::server::create_router`]; this module
//! only short-circuits preflight requests before they reach routing.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chatrelay_core::{ChatRequest, RelayError, parse_chat_request};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

/// Value of `Access-Control-Allow-Origin` on every response.
pub const ALLOW_ORIGIN: &str = "*";

/// Value of `Access-Control-Allow-Headers` on every response.
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Request id header echoed on every response.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Client identity header, recorded on the request span only.
const X_CLIENT_INFO: &str = "x-client-info";

/// Answer CORS preflight requests without touching the rest of the pipeline.
pub async fn preflight(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        debug!(path = %req.uri().path(), "Answering CORS preflight");
        return (StatusCode::OK, "ok").into_response();
    }

    next.run(req).await
}

/// Wrap each request in a span carrying a fresh request id.
///
/// The body is never buffered here; streamed responses pass straight through.
pub async fn request_span(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();

    let client_info = req
        .headers()
        .get(X_CLIENT_INFO)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let span = info_span!(
        "http_request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
        client_info = %client_info,
    );

    async move {
        let mut response = next.run(req).await;

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(X_REQUEST_ID, value);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_millis(),
            "Response headers sent"
        );

        response
    }
    .instrument(span)
    .await
}

/// Parse and validate a chat request body.
pub fn parse_request(body: &[u8]) -> Result<ChatRequest, RelayError> {
    let request = parse_chat_request(body)?;

    debug!(
        history = request.history.len(),
        data_pack_len = request.data_pack.len(),
        streaming = request.stream,
        "Request validated"
    );

    Ok(request)
}
