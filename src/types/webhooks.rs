//! Webhook subscription models.

use serde::{Deserialize, Serialize};

/// Payload for subscribing to space events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    /// Endpoint the platform will POST events to
    pub url: String,
    /// Event names, e.g. "guest.joined"
    pub events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    /// Shared secret for signature verification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

/// A registered webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
