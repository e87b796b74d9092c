//! HTTP transport
//!
//! The submitter and discovery code talk to the network through the
//! [`HttpTransport`] trait so tests can script responses. The production
//! implementation is a blocking `reqwest` client with connect and request
//! timeouts.

use crate::error::{TransportError, TransportResult};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

/// A received HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Body decoded as UTF-8
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 OK with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }
}

/// Minimal blocking HTTP client
pub trait HttpTransport {
    /// Issue a GET request
    fn get(&self, url: &str) -> TransportResult<HttpResponse>;

    /// Issue a POST request with the given body and content type
    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> TransportResult<HttpResponse>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn get(&self, url: &str) -> TransportResult<HttpResponse> {
        (**self).get(url)
    }

    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> TransportResult<HttpResponse> {
        (**self).post(url, content_type, body)
    }
}

/// Timeouts for the production transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    /// Connection establishment timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Whole-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            request_timeout_ms: 30_000,
        }
    }
}

/// Blocking `reqwest` transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given timeouts
    pub fn new(options: TransportOptions) -> TransportResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_millis(options.connect_timeout_ms))
            .timeout(Duration::from_millis(options.request_timeout_ms))
            .build()
            .map_err(|e| TransportError::other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> TransportResult<HttpResponse> {
        let response = request
            .header(ACCEPT, "text/plain")
            .send()
            .map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(classify)?;

        tracing::trace!(status, bytes = body.len(), "Received HTTP response");
        Ok(HttpResponse { status, body })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str) -> TransportResult<HttpResponse> {
        tracing::debug!(url, "GET");
        self.send(self.client.get(url))
    }

    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> TransportResult<HttpResponse> {
        tracing::debug!(url, content_type, bytes = body.len(), "POST");
        self.send(
            self.client
                .post(url)
                .header(CONTENT_TYPE, content_type)
                .body(body),
        )
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    let reason = err.to_string();
    if err.is_timeout() {
        TransportError::Timeout { reason }
    } else if err.is_connect() {
        TransportError::ConnectionRefused { reason }
    } else {
        TransportError::Other { reason }
    }
}
