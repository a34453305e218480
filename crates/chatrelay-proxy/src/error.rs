//! Axum-specific error mapping.
//!
//! Wraps [`RelayError`] so handlers can return `Result<Response, HttpError>`
//! and use `?` on every stage. Rendering logs the full diagnostic and sends
//! the caller only the kind and the caller-safe message.

use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chatrelay_core::{ErrorKind, RelayError};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// JSON error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
}

impl From<&RelayError> for ErrorEnvelope {
    fn from(err: &RelayError) -> Self {
        Self {
            error: err.kind().as_str().to_string(),
            message: err.public_message(),
        }
    }
}

/// Handler error type.
#[derive(Debug)]
pub struct HttpError(pub RelayError);

impl From<RelayError> for HttpError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

/// Body read failures. An over-limit body keeps its 413, anything else is a 400.
impl From<BytesRejection> for HttpError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self(RelayError::PayloadTooLarge)
        } else {
            Self(RelayError::Validation(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )))
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match err.kind() {
            ErrorKind::Validation
            | ErrorKind::RateLimited
            | ErrorKind::NotFound
            | ErrorKind::MethodNotAllowed => {
                warn!(kind = %err.kind(), status = status.as_u16(), "{err}");
            }
            _ => {
                error!(kind = %err.kind(), status = status.as_u16(), "{err}");
            }
        }

        let mut response = (status, Json(ErrorEnvelope::from(&err))).into_response();

        // Pass the upstream's retry hint through for rate limits
        if let Some(retry_after) = err.retry_after()
            && let Ok(value) = HeaderValue::from_str(retry_after)
        {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }

        response
    }
}
