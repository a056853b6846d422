//! Space provisioning.
//!
//! Runs the guest-manager flow end to end: create a space, add a moderator,
//! apply safety settings and optionally send a custom invitation. The result
//! is a serializable [`ProvisionReport`] the caller can print or store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::client::GatherClient;
use crate::error::{ApiError, Error, Result};
use crate::types::{
    Guest, GuestRole, Invitation, InvitationRequest, NewGuest, SafetySettings, Space, SpaceConfig,
};

/// Text of the optional custom invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationText {
    pub subject: String,
    pub message: String,
}

/// Everything needed to provision one space.
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    pub space: SpaceConfig,
    pub moderator: NewGuest,
    pub safety: SafetySettings,
    /// Sent to the moderator after setup; failures here are not fatal.
    pub invitation: Option<InvitationText>,
}

impl ProvisionPlan {
    /// A plan with the recommended safety preset and no custom invitation.
    pub fn new(space: SpaceConfig, moderator_email: impl Into<String>) -> Self {
        Self {
            space,
            moderator: NewGuest::moderator(moderator_email),
            safety: SafetySettings::recommended(),
            invitation: None,
        }
    }

    /// Send a custom invitation once the space is ready.
    #[must_use]
    pub fn with_invitation(mut self, subject: impl Into<String>, message: impl Into<String>) -> Self {
        self.invitation = Some(InvitationText {
            subject: subject.into(),
            message: message.into(),
        });
        self
    }
}

/// Result of a provisioning run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionReport {
    pub space: Space,
    pub moderator: Guest,
    pub safety: SafetySettings,
    pub invitation: Option<Invitation>,
    /// Non-fatal problems encountered along the way
    pub warnings: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

impl ProvisionReport {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }
}

/// Runs a [`ProvisionPlan`] against a client.
pub struct Provisioner<'a> {
    client: &'a GatherClient,
}

impl<'a> Provisioner<'a> {
    pub fn new(client: &'a GatherClient) -> Self {
        Self { client }
    }

    /// Execute the plan.
    ///
    /// Space creation, moderator setup and safety configuration are
    /// critical and abort the run on failure. A moderator that is already a
    /// guest (409) is looked up instead. The custom invitation is
    /// best-effort.
    ///
    /// # Errors
    ///
    /// Returns the first critical failure.
    pub async fn run(&self, plan: &ProvisionPlan) -> Result<ProvisionReport> {
        let mut warnings = Vec::new();

        let space = self.client.spaces().create(&plan.space).await?;
        tracing::info!(space_id = %space.id, name = %space.name, "Space created");

        let moderator = self.ensure_moderator(&space.id, &plan.moderator, &mut warnings).await?;
        tracing::info!(space_id = %space.id, email = %moderator.email, "Moderator ready");

        let space = self
            .client
            .spaces()
            .apply_safety_settings(&space.id, &plan.safety)
            .await?;
        tracing::info!(space_id = %space.id, "Safety settings applied");

        let invitation = match &plan.invitation {
            Some(text) => self.send_invitation(&space, &plan.moderator, text, &mut warnings).await,
            None => None,
        };

        Ok(ProvisionReport {
            space,
            moderator,
            safety: plan.safety.clone(),
            invitation,
            warnings,
            completed_at: Utc::now(),
        })
    }

    async fn ensure_moderator(
        &self,
        space_id: &str,
        moderator: &NewGuest,
        warnings: &mut Vec<String>,
    ) -> Result<Guest> {
        match self.client.guests().add(space_id, moderator).await {
            Ok(guest) => Ok(guest),
            Err(Error::Api(ApiError::Conflict { message })) => {
                let existing = self
                    .client
                    .guests()
                    .list(space_id)
                    .await?
                    .into_iter()
                    .find(|g| g.email.eq_ignore_ascii_case(&moderator.email))
                    .ok_or_else(|| {
                        Error::Api(ApiError::Conflict {
                            message: message.clone(),
                        })
                    })?;

                warnings.push(format!(
                    "{} was already a guest ({message}); kept existing entry",
                    moderator.email
                ));
                if existing.role != GuestRole::Moderator {
                    warnings.push(format!(
                        "{} holds role {:?}, not moderator",
                        moderator.email, existing.role
                    ));
                }
                Ok(existing)
            }
            Err(e) => Err(e),
        }
    }

    async fn send_invitation(
        &self,
        space: &Space,
        moderator: &NewGuest,
        text: &InvitationText,
        warnings: &mut Vec<String>,
    ) -> Option<Invitation> {
        let request = InvitationRequest {
            space_id: space.id.clone(),
            email: moderator.email.clone(),
            role: moderator.role,
            subject: text.subject.clone(),
            message: text.message.clone(),
        };

        match self.client.invitations().send(&request).await {
            Ok(invitation) => Some(invitation),
            Err(error) => {
                tracing::warn!(
                    space_id = %space.id,
                    email = %moderator.email,
                    error = %error,
                    "Custom invitation failed, continuing"
                );
                warnings.push(format!("custom invitation not sent: {error}"));
                None
            }
        }
    }
}
