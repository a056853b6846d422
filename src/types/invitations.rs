//! Invitation data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::guests::GuestRole;

/// Payload for a custom invitation email.
///
/// Subject and message are supplied by the caller; the SDK does not ship
/// email templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationRequest {
    pub space_id: String,
    pub email: String,
    pub role: GuestRole,
    pub subject: String,
    pub message: String,
}

/// Response from the invitations endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: String,
    pub email: String,
    /// Delivery status reported by the API (e.g. "sent", "queued")
    pub status: String,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}
