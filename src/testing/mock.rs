//! Scripted in-memory transport.
//!
//! `MockTransport` implements [`ApiTransport`] without touching the network.
//! Responses are queued per `(method, path)` route and every call is
//! recorded, so tests can assert on exactly what the SDK sent.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{ApiError, Error, Result};
use crate::request::ApiRequest;
use crate::transport::ApiTransport;

/// Record of a request seen by the mock.
#[derive(Debug, Clone)]
pub struct MockCall {
    /// HTTP method (e.g. "POST")
    pub method: String,
    /// Request path
    pub path: String,
    /// JSON body, if one was sent
    pub body: Option<Value>,
    /// Timestamp of the call
    pub timestamp: DateTime<Utc>,
}

impl MockCall {
    fn new(request: &ApiRequest) -> Self {
        Self {
            method: request.method().as_str().to_string(),
            path: request.path().to_string(),
            body: request.body().cloned(),
            timestamp: Utc::now(),
        }
    }
}

/// A scripted outcome for one request.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 2xx with this JSON body
    Json(Value),
    /// Non-success status, classified like a real response
    Status { status: u16, message: String },
    /// Network failure with no response
    NetworkError(String),
}

impl MockResponse {
    /// Successful response with data.
    pub fn json(data: Value) -> Self {
        Self::Json(data)
    }

    /// Error response with a status code.
    pub fn status(status: u16, message: &str) -> Self {
        Self::Status {
            status,
            message: message.to_string(),
        }
    }

    fn into_result(self, request: &ApiRequest) -> Result<Value> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Status { status, message } => Err(Error::Api(ApiError::from_status(
                status,
                message,
                request.body().cloned(),
                None,
            ))),
            Self::NetworkError(message) => Err(Error::Http(message)),
        }
    }
}

#[derive(Default)]
struct MockState {
    calls: Vec<MockCall>,
    routes: HashMap<(String, String), VecDeque<MockResponse>>,
    fallbacks: HashMap<(String, String), MockResponse>,
}

/// Mock transport for testing code built on the SDK.
///
/// Clones share state, so a test can keep one handle for assertions while
/// the client under test owns another.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create an empty mock. Unscripted routes answer 404.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a one-shot response for a route. Queued responses are used in
    /// order before any fallback.
    pub fn enqueue(&self, method: &str, path: &str, response: MockResponse) {
        self.lock()
            .routes
            .entry((method.to_uppercase(), path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Set the response a route returns once its queue is empty.
    pub fn set_fallback(&self, method: &str, path: &str, response: MockResponse) {
        self.lock()
            .fallbacks
            .insert((method.to_uppercase(), path.to_string()), response);
    }

    /// All recorded calls, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Recorded calls for one route.
    #[must_use]
    pub fn calls_to(&self, method: &str, path: &str) -> Vec<MockCall> {
        let method = method.to_uppercase();
        self.lock()
            .calls
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .cloned()
            .collect()
    }

    /// Number of calls made to one route.
    #[must_use]
    pub fn call_count(&self, method: &str, path: &str) -> usize {
        self.calls_to(method, path).len()
    }

    /// Forget recorded calls; scripted responses are kept.
    pub fn reset_calls(&self) {
        self.lock().calls.clear();
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let key = (request.method().as_str().to_string(), request.path().to_string());

        let response = {
            let mut state = self.lock();
            state.calls.push(MockCall::new(request));

            let queued = state.routes.get_mut(&key).and_then(VecDeque::pop_front);
            queued
                .or_else(|| state.fallbacks.get(&key).cloned())
                .unwrap_or_else(|| {
                    MockResponse::status(404, &format!("no mock for {} {}", key.0, key.1))
                })
        };

        response.into_result(request)
    }
}
