//! HTTP transport for the game API
//!
//! The client talks to the server through the [`Transport`] trait so the
//! session logic can run against an in-memory server in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client};
use serde_json::Value;
use url::Url;

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("invalid request path {path}: {source}")]
    Url {
        path: String,
        source: url::ParseError,
    },
}

impl TransportError {
    /// HTTP status for errors the server answered with
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request(e) => e.status().map(|s| s.as_u16()),
            TransportError::Url { .. } => None,
        }
    }
}

/// One request/response exchange with the game server.
///
/// Implementations return the raw body of a successful response and map
/// every non-success status to [`TransportError::Status`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET path?query`. An empty `query` sends no query string at all.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, TransportError>;

    /// `POST path` with a JSON body
    async fn post_json(&self, path: &str, body: &Value) -> Result<String, TransportError>;
}

/// Cookie-session transport built on `reqwest`
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::limited(10))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url.join(path).map_err(|source| TransportError::Url {
            path: path.to_string(),
            source,
        })
    }

    async fn body(response: reqwest::Response) -> Result<String, TransportError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, TransportError> {
        let mut request = self.client.get(self.url(path)?);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        Self::body(response).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<String, TransportError> {
        let response = self.client.post(self.url(path)?).json(body).send().await?;
        Self::body(response).await
    }
}
