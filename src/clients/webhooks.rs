//! Webhooks resource client.

use std::sync::Arc;

use super::decode;
use crate::error::Result;
use crate::request::ApiRequest;
use crate::transport::ApiTransport;
use crate::types::{Webhook, WebhookRequest};

/// Client for event subscriptions.
pub struct WebhooksClient {
    transport: Arc<dyn ApiTransport>,
}

impl WebhooksClient {
    /// Create a new webhooks client.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Register a webhook.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an unreachable URL or unknown event.
    pub async fn register(&self, webhook: &WebhookRequest) -> Result<Webhook> {
        let request = ApiRequest::post("/webhooks", webhook)?;
        decode(self.transport.send(&request).await?)
    }
}
