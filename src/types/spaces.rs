//! Space-related data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A vendor-hosted virtual office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    /// Opaque space identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// URL guests use to join
    #[serde(default)]
    pub url: Option<String>,
    /// Description shown in the lobby
    #[serde(default)]
    pub description: Option<String>,
    /// Safety settings currently applied, when the API reports them
    #[serde(default)]
    pub safety: Option<SafetySettings>,
    /// When the space was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating a space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceConfig {
    /// Display name
    pub name: String,
    /// Description shown in the lobby
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Map template to start from (e.g. "office-medium")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Maximum concurrent occupants
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Whether only listed guests may enter
    pub is_private: bool,
}

impl SpaceConfig {
    /// A private space with the given name and nothing else set.
    pub fn private(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            template: None,
            capacity: None,
            is_private: true,
        }
    }
}

/// Partial update for an existing space; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety: Option<SafetySettings>,
}

/// Moderation and safety switches for a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetySettings {
    /// Moderators can mute, kick and ban
    pub moderation_enabled: bool,
    /// Guests wait in a lobby until admitted
    pub require_guest_approval: bool,
    /// Guests may share their screen
    pub allow_guest_screen_share: bool,
    /// Guests may edit the map
    pub allow_guest_build: bool,
    /// Chat messages pass through the profanity filter
    pub profanity_filter: bool,
    /// Occupants can report others to moderators
    pub reporting_enabled: bool,
}

impl SafetySettings {
    /// The canned preset applied to newly provisioned spaces.
    #[must_use]
    pub fn recommended() -> Self {
        Self {
            moderation_enabled: true,
            require_guest_approval: true,
            allow_guest_screen_share: false,
            allow_guest_build: false,
            profanity_filter: true,
            reporting_enabled: true,
        }
    }
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self::recommended()
    }
}
