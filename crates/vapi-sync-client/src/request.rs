//! Request model and the transport capability

use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// HTTP methods used against the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read a single object
    Get,
    /// Create an object in a collection
    Post,
    /// Partially update an existing object
    Patch,
}

impl Method {
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call against the upstream API
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`
    pub path: String,
    /// Bearer credential of the account this call targets
    pub api_key: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// `GET path`
    pub fn get(path: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            api_key: api_key.into(),
            body: None,
        }
    }

    /// `POST path` with a JSON body
    pub fn post(path: impl Into<String>, api_key: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            api_key: api_key.into(),
            body: Some(body),
        }
    }

    /// `PATCH path` with a JSON body
    pub fn patch(path: impl Into<String>, api_key: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Patch,
            path: path.into(),
            api_key: api_key.into(),
            body: Some(body),
        }
    }
}

// Keeps credentials out of logs and panic messages.
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("api_key", &"<redacted>")
            .field("body", &self.body)
            .finish()
    }
}

/// Transport capability: `send(method, path, key, body) -> JSON`
///
/// Implementations must report any non-success HTTP status as
/// [`TransportError::Status`]; callers never retry.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Perform one request and return the decoded JSON response
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: ApiClient + ?Sized> ApiClient for Arc<T> {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: ApiClient + ?Sized> ApiClient for &T {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        (**self).send(request).await
    }
}
