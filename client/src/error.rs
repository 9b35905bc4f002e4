//! Error types for the todo API client.
//!
//! # Design
//! The client never swallows errors: the 401 side effect runs in the
//! response interceptor and the failure still reaches the caller. `Http`
//! keeps the raw status code and body so callers (and log lines) see
//! exactly what the server said.

use thiserror::Error;

/// Errors surfaced by [`Api`](crate::Api) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request produced no usable response.
    #[error("network error: {0}")]
    Network(String),

    /// The configured request deadline elapsed.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A 2xx response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(_) => ApiError::Timeout,
            // Unreachable while status-as-error is disabled on the agent.
            ureq::Error::StatusCode(status) => ApiError::Http {
                status,
                body: String::new(),
            },
            other => ApiError::Network(other.to_string()),
        }
    }
}
