//! Relay error taxonomy.
//!
//! Every failure the relay can hit maps to exactly one [`RelayError`] variant.
//! Each variant knows its caller-visible kind, status code and message.
//! Diagnostic detail (transport errors, upstream bodies) is carried in
//! separate fields for logging and never appears in [`RelayError::public_message`].

use thiserror::Error;

/// Stable error discriminant sent to callers in the `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Configuration,
    RateLimited,
    Upstream,
    InvalidUpstreamResponse,
    Server,
    NotFound,
    MethodNotAllowed,
}

impl ErrorKind {
    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "ValidationError",
            Self::Configuration => "ConfigurationError",
            Self::RateLimited => "RateLimited",
            Self::Upstream => "UpstreamError",
            Self::InvalidUpstreamResponse => "InvalidUpstreamResponse",
            Self::Server => "ServerError",
            Self::NotFound => "NotFound",
            Self::MethodNotAllowed => "MethodNotAllowed",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur while relaying a chat request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request body is missing required fields or cannot be parsed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request body exceeds the size limit.
    #[error("Request body exceeds the size limit")]
    PayloadTooLarge,

    /// No upstream API key is configured.
    #[error("Upstream API key is not configured")]
    Configuration,

    /// The upstream answered 429.
    #[error("Rate limited by upstream provider (retry-after: {retry_after:?})")]
    RateLimited {
        /// Raw `Retry-After` value from the upstream, if any.
        retry_after: Option<String>,
    },

    /// The upstream answered with a non-success status other than 429.
    #[error("Upstream provider returned status {status}: {body}")]
    Upstream {
        status: u16,
        /// Upstream error body, for logs only.
        body: String,
    },

    /// The upstream answered 2xx but the completion text was not where expected.
    #[error("Invalid upstream response: {0}")]
    InvalidUpstreamResponse(String),

    /// The upstream could not be reached or the response could not be read.
    #[error("Upstream transport failure: {0}")]
    Server(String),

    /// No route matches the request path.
    #[error("No route for {0}")]
    NotFound(String),

    /// The route exists but does not accept this method.
    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),
}

impl RelayError {
    /// The caller-visible kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::PayloadTooLarge => ErrorKind::Validation,
            Self::Configuration => ErrorKind::Configuration,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::InvalidUpstreamResponse(_) => ErrorKind::InvalidUpstreamResponse,
            Self::Server(_) => ErrorKind::Server,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::MethodNotAllowed(_) => ErrorKind::MethodNotAllowed,
        }
    }

    /// HTTP status code the caller receives.
    ///
    /// Upstream errors mirror the upstream status when it is a valid error
    /// code. A non-success status outside 400..=599 (an unfollowed 3xx, say)
    /// is not mirrored and becomes 502 Bad Gateway instead.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::PayloadTooLarge => 413,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed(_) => 405,
            Self::RateLimited { .. } => 429,
            Self::Upstream { status, .. } => {
                if *status >= 400 && *status <= 599 {
                    *status
                } else {
                    502
                }
            }
            Self::Configuration | Self::InvalidUpstreamResponse(_) | Self::Server(_) => 500,
        }
    }

    /// Returns true if the caller may reasonably retry the same request later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Server(_) => true,
            Self::Upstream { status, .. } => *status >= 500,
            Self::Validation(_)
            | Self::PayloadTooLarge
            | Self::Configuration
            | Self::InvalidUpstreamResponse(_)
            | Self::NotFound(_)
            | Self::MethodNotAllowed(_) => false,
        }
    }

    /// Message safe to send to the caller.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::PayloadTooLarge => "Request body is too large".to_string(),
            Self::Configuration => "Server is not configured to reach the assistant".to_string(),
            Self::RateLimited { .. } => {
                "Too many requests to the assistant, please try again later".to_string()
            }
            Self::Upstream { status, .. } => format!("Upstream provider returned status {status}"),
            Self::InvalidUpstreamResponse(_) => {
                "Assistant returned a response in an unexpected format".to_string()
            }
            Self::Server(_) => "Failed to reach the assistant".to_string(),
            Self::NotFound(path) => format!("No route for {path}"),
            Self::MethodNotAllowed(method) => format!("Method {method} is not allowed here"),
        }
    }

    /// Raw `Retry-After` value to pass back to the caller, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<&str> {
        match self {
            Self::RateLimited { retry_after } => retry_after.as_deref(),
            _ => None,
        }
    }
}
