//! HTTP transport for generation requests
//!
//! The client talks to the network through the [`Transport`] trait so the
//! retry loop can be driven by scripted responses in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::debug;

use super::types::GenerateRequest;
use crate::error::{Error, Result};

/// A fully buffered HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends one generation request and returns the buffered response
///
/// Implementations report connection-level faults (refused connections,
/// timeouts, DNS failures, truncated bodies) as [`Error::Transport`]. Any
/// HTTP status, success or not, is an `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, endpoint: &str, api_key: &str, request: &GenerateRequest) -> Result<RawResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: HttpClient,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, endpoint: &str, api_key: &str, request: &GenerateRequest) -> Result<RawResponse> {
        debug!(endpoint = %endpoint, "Sending generation request");

        // The key travels as a query parameter; keep it out of error messages
        let response = self
            .http_client
            .post(endpoint)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.without_url().to_string()))?;

        debug!(status, body_len = body.len(), "Received generation response");
        Ok(RawResponse { status, body })
    }
}
