//! Guest-list data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role a guest holds in a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestRole {
    Guest,
    Member,
    Moderator,
    Admin,
}

/// What a guest is allowed to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestPermissions {
    pub can_moderate: bool,
    pub can_manage_guests: bool,
    pub can_build: bool,
    pub can_broadcast: bool,
}

impl GuestPermissions {
    /// Default permission set for a role.
    #[must_use]
    pub fn for_role(role: GuestRole) -> Self {
        match role {
            GuestRole::Guest => Self {
                can_moderate: false,
                can_manage_guests: false,
                can_build: false,
                can_broadcast: false,
            },
            GuestRole::Member => Self {
                can_moderate: false,
                can_manage_guests: false,
                can_build: true,
                can_broadcast: false,
            },
            GuestRole::Moderator => Self {
                can_moderate: true,
                can_manage_guests: true,
                can_build: false,
                can_broadcast: true,
            },
            GuestRole::Admin => Self {
                can_moderate: true,
                can_manage_guests: true,
                can_build: true,
                can_broadcast: true,
            },
        }
    }
}

/// An entry in a space's access list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    /// Guest identifier within the space
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: GuestRole,
    #[serde(default)]
    pub permissions: Option<GuestPermissions>,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

/// Payload for adding a guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: GuestRole,
    pub permissions: GuestPermissions,
}

impl NewGuest {
    /// A guest with the role's default permissions.
    pub fn new(email: impl Into<String>, role: GuestRole) -> Self {
        Self {
            email: email.into(),
            name: None,
            role,
            permissions: GuestPermissions::for_role(role),
        }
    }

    /// A moderator with the default moderator permissions.
    pub fn moderator(email: impl Into<String>) -> Self {
        Self::new(email, GuestRole::Moderator)
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Partial update for an existing guest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<GuestRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<GuestPermissions>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_deserialize() {
        let json = r#"{
            "id": "g-1",
            "email": "mod@example.com",
            "role": "moderator",
            "permissions": {
                "canModerate": true,
                "canManageGuests": true,
                "canBuild": false,
                "canBroadcast": true
            },
            "addedAt": "2024-01-16T10:30:00Z"
        }"#;

        let guest: Guest = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(guest.role, GuestRole::Moderator);
        assert_eq!(
            guest.permissions,
            Some(GuestPermissions::for_role(GuestRole::Moderator))
        );
    }

    #[test]
    fn test_guest_minimal_deserialize() {
        let guest: Guest =
            serde_json::from_str(r#"{"id":"g-2","email":"a@b.c","role":"guest"}"#).unwrap();
        assert!(guest.name.is_none());
        assert!(guest.permissions.is_none());
    }

    #[test]
    fn test_moderator_payload() {
        let value = serde_json::to_value(NewGuest::moderator("mod@example.com")).unwrap();
        assert_eq!(value["role"], "moderator");
        assert_eq!(value["permissions"]["canModerate"], true);
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_role_permissions_escalate() {
        let guest = GuestPermissions::for_role(GuestRole::Guest);
        let admin = GuestPermissions::for_role(GuestRole::Admin);
        assert!(!guest.can_moderate && !guest.can_build);
        assert!(admin.can_moderate && admin.can_build && admin.can_manage_guests);
    }
}
