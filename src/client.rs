//! Gather SDK main client.
//!
//! Provides the primary interface for interacting with the Gather API.

use std::sync::Arc;

use crate::clients::{GuestsClient, InvitationsClient, SpacesClient, WebhooksClient};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::rate_limit::{RateLedger, RateLimitedTransport};
use crate::transport::{ApiTransport, HttpTransport};

/// Main client for interacting with the Gather API.
///
/// Aggregates all resource clients over one shared transport.
///
/// # Example
///
/// ```rust,ignore
/// use gather::{ClientConfig, GatherClient, NewGuest, SpaceConfig};
///
/// let client = GatherClient::new(ClientConfig::new(api_key))?;
///
/// let space = client.spaces().create(&SpaceConfig::private("Team HQ")).await?;
/// client.guests().add(&space.id, &NewGuest::moderator("lead@example.com")).await?;
/// ```
pub struct GatherClient {
    transport: Arc<dyn ApiTransport>,
    spaces: SpacesClient,
    guests: GuestsClient,
    invitations: InvitationsClient,
    webhooks: WebhooksClient,
}

impl GatherClient {
    /// Create a new Gather client.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the API key is empty or the
    /// configuration is otherwise invalid. No request is sent.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::from_transport(Arc::new(transport)))
    }

    /// Create a client whose requests are charged against `tier` in `ledger`
    /// before they are sent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the configuration is invalid.
    pub fn with_rate_limit(
        config: ClientConfig,
        ledger: Arc<RateLedger>,
        tier: impl Into<String>,
    ) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        let limited = RateLimitedTransport::new(transport, ledger, tier);
        Ok(Self::from_transport(Arc::new(limited)))
    }

    /// Build a client over any transport (for example a mock).
    pub fn from_transport(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            spaces: SpacesClient::new(Arc::clone(&transport)),
            guests: GuestsClient::new(Arc::clone(&transport)),
            invitations: InvitationsClient::new(Arc::clone(&transport)),
            webhooks: WebhooksClient::new(Arc::clone(&transport)),
            transport,
        }
    }

    /// Get the underlying transport (for advanced use cases).
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn ApiTransport> {
        &self.transport
    }

    /// Get the spaces client.
    #[must_use]
    pub fn spaces(&self) -> &SpacesClient {
        &self.spaces
    }

    /// Get the guests client.
    #[must_use]
    pub fn guests(&self) -> &GuestsClient {
        &self.guests
    }

    /// Get the invitations client.
    #[must_use]
    pub fn invitations(&self) -> &InvitationsClient {
        &self.invitations
    }

    /// Get the webhooks client.
    #[must_use]
    pub fn webhooks(&self) -> &WebhooksClient {
        &self.webhooks
    }
}
