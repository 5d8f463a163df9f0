//! reqwest-backed [`ApiClient`]

use crate::error::TransportError;
use crate::request::{ApiClient, ApiRequest, Method};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://api.vapi.ai";

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme and host, without trailing slash
    pub base_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Configuration for `base_url`, trailing slashes trimmed
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs: None,
        }
    }

    /// With a per-request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Absolute URL for an API path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// HTTP client for the upstream API
///
/// The bearer credential is per request, so one client serves both the
/// source and the destination account.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: ClientConfig,
    client: Client,
}

impl HttpClient {
    /// Create a new client
    ///
    /// # Errors
    /// [`TransportError::Build`] if the TLS backend cannot be initialized
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(TransportError::Build)?;
        Ok(Self { config, client })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn handle_response(
        method: Method,
        path: &str,
        response: reqwest::Response,
    ) -> Result<Value, TransportError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| TransportError::Http {
                method,
                path: path.to_string(),
                source,
            })?;

        if !status.is_success() {
            return Err(TransportError::status(method, path, status.as_u16(), text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|source| TransportError::Decode {
            method,
            path: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ApiClient for HttpClient {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let ApiRequest {
            method,
            path,
            api_key,
            body,
        } = request;
        let url = self.config.url(&path);
        tracing::debug!(%method, %path, "sending request");

        let mut builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
        }
        .bearer_auth(&api_key)
        .header(header::ACCEPT, "application/json");

        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| TransportError::Http {
                method,
                path: path.clone(),
                source,
            })?;

        tracing::debug!(%method, %path, status = response.status().as_u16(), "received response");
        Self::handle_response(method, &path, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::net::SocketAddr;
    use warp::http::StatusCode;
    use warp::Filter;

    async fn spawn_server() -> SocketAddr {
        let get_tool = warp::get()
            .and(warp::path!("tool" / String))
            .and(warp::header::<String>("authorization"))
            .map(|id: String, auth: String| {
                warp::reply::json(&json!({ "id": id, "authorization": auth }))
            });

        let create_tool = warp::post()
            .and(warp::path!("tool"))
            .and(warp::body::json())
            .map(|body: Value| warp::reply::json(&json!({ "id": "T-new", "echo": body })));

        let patch_tool = warp::patch()
            .and(warp::path!("tool" / String))
            .map(|_id: String| {
                warp::reply::with_status("tool not found", StatusCode::NOT_FOUND)
            });

        let routes = get_tool.or(create_tool).or(patch_tool);
        let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }

    fn client_for(addr: SocketAddr) -> HttpClient {
        HttpClient::new(ClientConfig::new(format!("http://{addr}/"))).unwrap()
    }

    #[test]
    fn config_trims_trailing_slash() {
        let config = ClientConfig::new("https://example.test///");
        assert_eq!(config.base_url, "https://example.test");
        assert_eq!(config.url("/tool/T1"), "https://example.test/tool/T1");
        assert_eq!(ClientConfig::default().base_url, DEFAULT_BASE_URL);
        assert_eq!(config.with_timeout_secs(5).timeout_secs, Some(5));
    }

    #[tokio::test]
    async fn get_sends_bearer_credential() {
        let client = client_for(spawn_server().await);

        let value = client
            .send(ApiRequest::get("/tool/T1", "source-key"))
            .await
            .unwrap();

        assert_eq!(
            value,
            json!({ "id": "T1", "authorization": "Bearer source-key" })
        );
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let client = client_for(spawn_server().await);

        let value = client
            .send(ApiRequest::post(
                "/tool",
                "dest-key",
                json!({ "type": "function", "name": "lookup" }),
            ))
            .await
            .unwrap();

        assert_eq!(value["id"], "T-new");
        assert_eq!(value["echo"], json!({ "type": "function", "name": "lookup" }));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let client = client_for(spawn_server().await);

        let err = client
            .send(ApiRequest::patch("/tool/T1", "dest-key", json!({})))
            .await
            .unwrap_err();

        match err {
            TransportError::Status {
                method,
                path,
                status,
                body,
            } => {
                assert_eq!(method, Method::Patch);
                assert_eq!(path, "/tool/T1");
                assert_eq!(status, 404);
                assert_eq!(body, "tool not found");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }
}
