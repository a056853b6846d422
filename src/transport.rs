//! HTTP transport for the Gather SDK.
//!
//! Handles HTTP communication with authentication headers, bounded retry
//! with exponential backoff, and classification of error responses.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::thread_rng;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ApiError, Error, Result};
use crate::request::ApiRequest;

/// Decides whether a failed attempt may be retried.
pub type RetryPredicate = Arc<dyn Fn(&Error) -> bool + Send + Sync>;

/// Configuration for automatic retry behavior.
///
/// Attempt `k` (zero-based) waits `base_backoff * 2^k` before the next try.
#[derive(Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (total attempts = max_retries + 1)
    pub max_retries: u32,
    /// Wait before the first retry; doubled for each later one
    pub base_backoff: Duration,
    /// Upper bound for a single wait
    pub max_backoff: Duration,
    /// Jitter factor (0.1 = ±10%)
    pub jitter: f64,
    /// Whether a server Retry-After header replaces the computed wait
    pub respect_retry_after: bool,
    /// Retry eligibility; defaults to [`Error::is_retryable`]
    pub retry_if: RetryPredicate,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff: Duration::from_millis(1000),
            max_backoff: Duration::from_secs(60),
            jitter: 0.0,
            respect_retry_after: false,
            retry_if: Arc::new(Error::is_retryable),
        }
    }
}

impl fmt::Debug for RetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("max_retries", &self.max_retries)
            .field("base_backoff", &self.base_backoff)
            .field("max_backoff", &self.max_backoff)
            .field("jitter", &self.jitter)
            .field("respect_retry_after", &self.respect_retry_after)
            .finish_non_exhaustive()
    }
}

impl RetryConfig {
    /// Never retry.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Replace the retry predicate.
    #[must_use]
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Error) -> bool + Send + Sync + 'static,
    {
        self.retry_if = Arc::new(predicate);
        self
    }

    /// Whether `error` is eligible for another attempt after `attempt`.
    #[must_use]
    pub fn should_retry(&self, error: &Error, attempt: u32) -> bool {
        attempt < self.max_retries && (self.retry_if)(error)
    }

    /// Calculate the wait after a failed `attempt`.
    ///
    /// Uses exponential backoff with optional jitter, capped at
    /// `max_backoff`. A server hint wins when `respect_retry_after` is set.
    #[must_use]
    pub fn backoff_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(hint) = retry_after {
            if self.respect_retry_after {
                return hint.min(self.max_backoff);
            }
        }

        let base_wait = 2u32
            .checked_pow(attempt)
            .map_or(self.max_backoff, |factor| self.base_backoff.saturating_mul(factor));

        let wait = if self.jitter > 0.0 {
            let offset = thread_rng().gen_range(-self.jitter..self.jitter);
            base_wait.mul_f64((1.0 + offset).max(0.0))
        } else {
            base_wait
        };

        wait.min(self.max_backoff)
    }
}

/// Something that can execute an [`ApiRequest`].
///
/// Resource clients only see this trait, so decorators such as
/// [`crate::rate_limit::RateLimitedTransport`] and the in-memory
/// [`crate::testing::MockTransport`] slot in without changes elsewhere.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Execute the request and return the decoded JSON body.
    async fn send(&self, request: &ApiRequest) -> Result<Value>;
}

/// HTTP transport layer with authentication and retry logic.
///
/// Handles:
/// - Bearer-token, content-type and client identifier headers
/// - Exponential backoff for 429, 5xx and network failures
/// - Error response parsing into typed errors
pub struct HttpTransport {
    base_url: String,
    client: Client,
    retry_config: RetryConfig,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("retry_config", &self.retry_config)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a new HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the configuration is invalid (for
    /// example an empty API key) or the HTTP client cannot be created. No
    /// network activity happens here.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|_| Error::Configuration("Invalid user agent".to_string()))?,
        );

        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| Error::Configuration("Invalid API key format".to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            retry_config: config.retry.clone(),
        })
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the retry policy.
    #[must_use]
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    /// Execute a request with automatic retry on retryable errors.
    async fn execute_with_retry(&self, request: &ApiRequest) -> Result<Value> {
        let url = request.url(&self.base_url);
        let mut attempt: u32 = 0;

        loop {
            let start = Instant::now();
            tracing::debug!(
                method = %request.method(),
                path = %request.path(),
                attempt,
                "Sending request"
            );

            let error = match self.execute_once(request, &url).await {
                Ok(value) => {
                    tracing::debug!(
                        method = %request.method(),
                        path = %request.path(),
                        attempt,
                        duration_ms = %start.elapsed().as_millis(),
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !self.retry_config.should_retry(&error, attempt) {
                tracing::warn!(
                    method = %request.method(),
                    path = %request.path(),
                    attempt,
                    status = ?error.status(),
                    error = %error,
                    "Request failed"
                );
                return Err(error);
            }

            let wait = self.retry_config.backoff_for(attempt, error.retry_after());
            tracing::warn!(
                method = %request.method(),
                path = %request.path(),
                attempt,
                status = ?error.status(),
                wait_ms = %wait.as_millis(),
                error = %error,
                "Transient failure, retrying"
            );

            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }

    /// One attempt: send, then decode or classify.
    async fn execute_once(&self, request: &ApiRequest, url: &str) -> Result<Value> {
        let mut builder = self.client.request(request.method().clone(), url);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::parse_error_response(response, request.body()).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            Error::InvalidResponse(format!(
                "Failed to parse response: {e} (body: {})",
                String::from_utf8_lossy(&bytes)
            ))
        })
    }

    /// Parse an error response into a typed error.
    async fn parse_error_response(response: Response, payload: Option<&Value>) -> Error {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text).unwrap_or_else(|| format!("HTTP {status}"));

        Error::Api(ApiError::from_status(
            status,
            message,
            payload.cloned(),
            retry_after,
        ))
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        self.execute_with_retry(request).await
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"error": "..."}`, `{"error": {"message": "..."}}` and
/// `{"message": "..."}`; anything else non-empty is returned verbatim.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(data) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_string());
    };

    let from_error = data.get("error").and_then(|error| match error {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => error
            .get("message")
            .and_then(Value::as_str)
            .map(String::from),
        _ => None,
    });

    from_error
        .or_else(|| data.get("message").and_then(Value::as_str).map(String::from))
        .or_else(|| Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();

        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_backoff, Duration::from_millis(1000));
        assert!(!config.respect_retry_after);
        assert!(config.jitter.abs() < f64::EPSILON);
    }

    #[test]
    fn test_should_retry() {
        let config = RetryConfig::default();
        let server = Error::Api(ApiError::from_status(500, "boom".into(), None, None));
        let throttled = Error::Api(ApiError::from_status(429, "slow down".into(), None, None));

        assert!(config.should_retry(&server, 0));
        assert!(config.should_retry(&throttled, 2));
        assert!(!config.should_retry(&server, 3)); // Max retries reached

        assert!(config.should_retry(&Error::Http("connection reset".into()), 0));

        for status in [400, 401, 403, 404, 409] {
            let error = Error::Api(ApiError::from_status(status, "no".into(), None, None));
            assert!(!config.should_retry(&error, 0), "status {status}");
        }
    }

    #[test]
    fn test_custom_predicate() {
        let config = RetryConfig::default().with_predicate(|e| matches!(e, Error::Http(_)));
        let server = Error::Api(ApiError::from_status(503, "down".into(), None, None));

        assert!(!config.should_retry(&server, 0));
        assert!(config.should_retry(&Error::Http("timeout".into()), 0));
    }

    #[test]
    fn test_backoff_time_exponential() {
        let config = RetryConfig::default();

        assert_eq!(config.backoff_for(0, None), Duration::from_millis(1000));
        assert_eq!(config.backoff_for(1, None), Duration::from_millis(2000));
        assert_eq!(config.backoff_for(2, None), Duration::from_millis(4000));
        assert_eq!(config.backoff_for(3, None), Duration::from_millis(8000));
    }

    #[test]
    fn test_backoff_time_capped_at_max() {
        let config = RetryConfig {
            base_backoff: Duration::from_secs(10),
            max_backoff: Duration::from_secs(30),
            ..Default::default()
        };

        assert_eq!(config.backoff_for(3, None), Duration::from_secs(30));
        assert_eq!(config.backoff_for(64, None), Duration::from_secs(30));
    }

    #[test]
    fn test_backoff_ignores_retry_after_by_default() {
        let config = RetryConfig::default();
        assert_eq!(
            config.backoff_for(0, Some(Duration::from_secs(30))),
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_backoff_time_respects_retry_after() {
        let config = RetryConfig {
            respect_retry_after: true,
            ..Default::default()
        };

        assert_eq!(
            config.backoff_for(0, Some(Duration::from_secs(30))),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_backoff_jitter_stays_in_range() {
        let config = RetryConfig {
            jitter: 0.1,
            ..Default::default()
        };

        for _ in 0..50 {
            let wait = config.backoff_for(1, None);
            assert!(wait >= Duration::from_millis(1800) && wait <= Duration::from_millis(2200));
        }
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(error_message(r#"{"error":"bad email"}"#).as_deref(), Some("bad email"));
        assert_eq!(
            error_message(r#"{"error":{"code":"X","message":"nested"}}"#).as_deref(),
            Some("nested")
        );
        assert_eq!(error_message(r#"{"message":"top"}"#).as_deref(), Some("top"));
        assert_eq!(error_message("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message("  "), None);
    }

    #[test]
    fn test_transport_requires_api_key() {
        let config = ClientConfig::new("");
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_transport_trims_base_url() {
        let config = ClientConfig::builder("gt_key")
            .base_url("https://api.gather.town/api/v2/")
            .build()
            .unwrap();
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.base_url(), "https://api.gather.town/api/v2");
    }
}
