//! Data model types for the Gather SDK.

pub mod guests;
pub mod invitations;
pub mod spaces;
pub mod webhooks;

// Re-exports
pub use guests::{Guest, GuestPermissions, GuestRole, GuestUpdate, NewGuest};
pub use invitations::{Invitation, InvitationRequest};
pub use spaces::{SafetySettings, Space, SpaceConfig, SpaceUpdate};
pub use webhooks::{Webhook, WebhookRequest};
