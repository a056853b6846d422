//! Client configuration and builder.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::transport::RetryConfig;

/// Default base URL for the Gather API.
pub const DEFAULT_BASE_URL: &str = "https://api.gather.town/api/v2";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Gather client.
///
/// Built explicitly by the caller; nothing here is read from the process
/// environment. The `Debug` implementation masks the API key.
#[derive(Clone)]
pub struct ClientConfig {
    /// Bearer token sent with every request
    pub api_key: String,
    /// Base URL of the API (e.g. "https://api.gather.town/api/v2")
    pub base_url: String,
    /// Per-request timeout (default: 30 seconds)
    pub timeout: Duration,
    /// Retry behaviour for transient failures
    pub retry: RetryConfig,
    /// User-Agent header value identifying this client
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***REDACTED***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Minimum allowed timeout value.
    pub const MIN_TIMEOUT: Duration = Duration::from_millis(100);

    /// Create a configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
            user_agent: default_user_agent(),
        }
    }

    /// Create a new configuration builder.
    pub fn builder(api_key: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(api_key)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the API key is empty, the base URL
    /// does not parse, or the timeout is below [`Self::MIN_TIMEOUT`].
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Configuration("api_key cannot be empty".to_string()));
        }

        if self.base_url.is_empty() {
            return Err(Error::Configuration("base_url cannot be empty".to_string()));
        }

        url::Url::parse(&self.base_url)
            .map_err(|e| Error::Configuration(format!("Invalid base_url: {e}")))?;

        if self.timeout < Self::MIN_TIMEOUT {
            return Err(Error::Configuration(format!(
                "timeout ({:?}) must be >= {:?}",
                self.timeout,
                Self::MIN_TIMEOUT
            )));
        }

        Ok(())
    }
}

fn default_user_agent() -> String {
    format!("gather-sdk-rust/{}", env!("CARGO_PKG_VERSION"))
}

/// Builder for client configuration.
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(api_key),
        }
    }

    /// Override the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Replace the whole retry policy.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set the maximum number of retries.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.retry.max_retries = max_retries;
        self
    }

    /// Set the base delay for exponential backoff.
    pub fn base_backoff(mut self, delay: Duration) -> Self {
        self.config.retry.base_backoff = delay;
        self
    }

    /// Set a custom User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration, validating all settings.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::validate`].
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
