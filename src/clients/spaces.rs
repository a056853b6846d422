//! Spaces resource client.

use std::sync::Arc;

use super::{decode, segment};
use crate::error::Result;
use crate::request::ApiRequest;
use crate::transport::ApiTransport;
use crate::types::{SafetySettings, Space, SpaceConfig, SpaceUpdate};

/// Client for space lifecycle operations.
pub struct SpacesClient {
    transport: Arc<dyn ApiTransport>,
}

impl SpacesClient {
    /// Create a new spaces client.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Create a new space.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the API rejects the configuration.
    pub async fn create(&self, config: &SpaceConfig) -> Result<Space> {
        let request = ApiRequest::post("/spaces", config)?;
        decode(self.transport.send(&request).await?)
    }

    /// Get a space by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the space does not exist or is not visible to
    /// this API key.
    pub async fn get(&self, space_id: &str) -> Result<Space> {
        let request = ApiRequest::get(format!("/spaces/{}", segment(space_id)));
        decode(self.transport.send(&request).await?)
    }

    /// Update a space. Fields left unset in `update` are not sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    pub async fn update(&self, space_id: &str, update: &SpaceUpdate) -> Result<Space> {
        let request = ApiRequest::put(format!("/spaces/{}", segment(space_id)), update)?;
        decode(self.transport.send(&request).await?)
    }

    /// Replace the safety settings of a space.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Permission` if the key cannot administer the space.
    pub async fn apply_safety_settings(
        &self,
        space_id: &str,
        settings: &SafetySettings,
    ) -> Result<Space> {
        let update = SpaceUpdate {
            safety: Some(settings.clone()),
            ..SpaceUpdate::default()
        };
        self.update(space_id, &update).await
    }
}
