//! Gather SDK for Rust
//!
//! Client for provisioning Gather spaces: create a space, manage its guest
//! list, apply safety settings and send invitations.
//!
//! The transport retries transient failures (429, 5xx, network errors) with
//! exponential backoff and maps every other failure onto a closed error
//! enum. An optional client-side [`RateLedger`] can be layered on top with
//! [`RateLimitedTransport`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gather::{ClientConfig, GatherClient, ProvisionPlan, Provisioner, SpaceConfig};
//!
//! let config = ClientConfig::builder(api_key).build()?;
//! let client = GatherClient::new(config)?;
//!
//! let plan = ProvisionPlan::new(SpaceConfig::private("Team HQ"), "lead@example.com");
//! let report = Provisioner::new(&client).run(&plan).await?;
//! println!("{}", report.to_json_pretty()?);
//! ```

pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod provision;
pub mod rate_limit;
pub mod request;
pub mod testing;
pub mod transport;
pub mod types;

// Re-exports
pub use client::GatherClient;
pub use clients::{
    BatchConfig, BatchFailure, BatchReport, GuestsClient, InvitationsClient, SpacesClient,
    WebhooksClient,
};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use error::{ApiError, Error, Result};
pub use provision::{InvitationText, ProvisionPlan, ProvisionReport, Provisioner};
pub use rate_limit::{RateLedger, RateLimitStatus, RateLimitedTransport, RateTier};
pub use request::ApiRequest;
pub use transport::{ApiTransport, HttpTransport, RetryConfig, RetryPredicate};
pub use types::{
    Guest, GuestPermissions, GuestRole, GuestUpdate, Invitation, InvitationRequest, NewGuest,
    SafetySettings, Space, SpaceConfig, SpaceUpdate, Webhook, WebhookRequest,
};
