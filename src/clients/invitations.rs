//! Invitations resource client.

use std::sync::Arc;

use super::decode;
use crate::error::Result;
use crate::request::ApiRequest;
use crate::transport::ApiTransport;
use crate::types::{Invitation, InvitationRequest};

/// Client for custom invitation emails.
pub struct InvitationsClient {
    transport: Arc<dyn ApiTransport>,
}

impl InvitationsClient {
    /// Create a new invitations client.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Dispatch a custom invitation.
    ///
    /// # Errors
    ///
    /// Returns an error if the invitation is rejected or cannot be sent.
    pub async fn send(&self, invitation: &InvitationRequest) -> Result<Invitation> {
        let request = ApiRequest::post("/invitations", invitation)?;
        decode(self.transport.send(&request).await?)
    }
}
