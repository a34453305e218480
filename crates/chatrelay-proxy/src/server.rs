//! Axum HTTP server for the chat relay.
//!
//! This module provides the router and the `serve()` function that runs it
//! on a pre-bound `TcpListener` until the cancellation token fires.

use axum::{
    Json, Router,
    extract::{State, rejection::BytesRejection},
    http::{HeaderValue, Method, Uri, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
};
use bytes::Bytes;
use chatrelay_core::RelayError;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::emitter;
use crate::error::HttpError;
use crate::gate::{self, ALLOW_HEADERS, ALLOW_ORIGIN};
use crate::relay;
use crate::state::AppState;

/// Build the router with all routes and the gate middleware.
///
/// Layers run outside-in: CORS headers are stamped last on the way out, so
/// preflight answers, errors and 404s all carry them.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(chat))
        .route("/chat", any(chat))
        .route("/health", get(health_check).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(middleware::from_fn(gate::preflight))
        .layer(middleware::from_fn(gate::request_span))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .with_state(state)
}

/// Start the relay server with a pre-bound listener.
///
/// Runs until `cancel` is triggered, then drains in-flight requests.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;

    if state.config.api_key.is_none() {
        tracing::warn!("No upstream API key configured; chat requests will fail");
    }

    let app = create_router(state);

    info!("Chat relay listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Chat relay shut down");
    Ok(())
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

async fn not_found(uri: Uri) -> HttpError {
    RelayError::NotFound(uri.path().to_string()).into()
}

async fn method_not_allowed(method: Method) -> HttpError {
    RelayError::MethodNotAllowed(method.to_string()).into()
}

/// Validate, relay and emit one chat request.
async fn chat(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, HttpError> {
    let body = body?;
    let request = gate::parse_request(&body)?;

    info!(
        streaming = request.stream,
        history = request.history.len(),
        "Processing chat request"
    );

    let outcome = relay::relay(&state, request).await?;
    Ok(emitter::emit(outcome))
}
