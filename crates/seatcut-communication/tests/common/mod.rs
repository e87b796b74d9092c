//! Scripted transport shared by the integration tests.

#![allow(dead_code)]

use seatcut_communication::{HttpResponse, HttpTransport, TransportError, TransportResult};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A request seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Answers requests from a queue and records what was sent
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<TransportResult<HttpResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::ok(body)));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self, request: RecordedRequest) -> TransportResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::other("no scripted response left")))
    }
}

impl HttpTransport for MockTransport {
    fn get(&self, url: &str) -> TransportResult<HttpResponse> {
        self.next(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            content_type: None,
            body: Vec::new(),
        })
    }

    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> TransportResult<HttpResponse> {
        self.next(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            content_type: Some(content_type.to_string()),
            body,
        })
    }
}

pub fn refused() -> TransportError {
    TransportError::ConnectionRefused {
        reason: "connection refused".to_string(),
    }
}
