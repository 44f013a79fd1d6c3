//! # Release Feed Client
//!
//! Fetches the core version history over HTTP. One request per run, no
//! caching and no retries: a feed that cannot be fetched fails the run.

use matrix_core::{MatrixError, ReleaseFeedEntry, parse_release_feed};

/// Errors from the HTTP client layer.
#[derive(Debug)]
pub enum ClientError {
    /// Cannot reach the feed.
    ConnectionFailed(String),
    /// The feed answered with a non-success status.
    HttpStatus(u16, String),
    /// Failed to read or decode the response body.
    ParseError(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(url) => write!(f, "Cannot connect to release feed at {url}"),
            Self::HttpStatus(status, url) => write!(f, "Release feed {url} returned HTTP {status}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ClientError> for MatrixError {
    fn from(e: ClientError) -> Self {
        Self::FeedUnavailable(e.to_string())
    }
}

/// HTTP client for the release feed endpoint.
#[derive(Clone)]
pub struct ReleaseFeedClient {
    http: reqwest::Client,
    url: String,
}

impl ReleaseFeedClient {
    /// Create a client for the given feed URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a request and handle connection errors.
    async fn send(&self) -> Result<reqwest::Response, ClientError> {
        self.http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.url)))
    }

    /// GET the feed and decode its core releases.
    pub async fn fetch(&self) -> Result<Vec<ReleaseFeedEntry>, ClientError> {
        let resp = self.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus(status.as_u16(), self.url.clone()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;
        parse_release_feed(&body).map_err(|e| ClientError::ParseError(e.to_string()))
    }
}
