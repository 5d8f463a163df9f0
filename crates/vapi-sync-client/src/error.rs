//! Error types for the transport

use crate::request::Method;

/// Transport-level failure of a single request
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Request never produced a response (DNS, connect, TLS, ...)
    #[error("{method} {path} failed: {source}")]
    Http {
        method: Method,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{method} {path} returned HTTP {status}: {body}")]
    Status {
        method: Method,
        path: String,
        status: u16,
        body: String,
    },

    /// Response body was not valid JSON
    #[error("{method} {path} returned invalid JSON: {source}")]
    Decode {
        method: Method,
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    /// Create a non-success status error
    pub fn status(
        method: Method,
        path: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self::Status {
            method,
            path: path.into(),
            status,
            body: body.into(),
        }
    }

    /// HTTP status, if the server answered
    #[inline]
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
