//! Guests resource client.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use super::{decode, decode_list, segment};
use crate::error::{Error, Result};
use crate::request::ApiRequest;
use crate::transport::ApiTransport;
use crate::types::{Guest, GuestUpdate, NewGuest};

/// Throttle for bulk guest invitations.
///
/// Guests are sent in fixed-size batches; requests within a batch run
/// concurrently and batches are separated by `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Guests per batch (minimum 1)
    pub batch_size: usize,
    /// Pause between consecutive batches
    pub delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            delay: Duration::from_secs(1),
        }
    }
}

/// A guest that could not be added.
#[derive(Debug)]
pub struct BatchFailure {
    pub email: String,
    pub error: Error,
}

/// Outcome of [`GuestsClient::add_many`].
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Guests the API accepted, in input order
    pub added: Vec<Guest>,
    /// Guests the API rejected, in input order
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// True when every guest was added.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Client for guest-list management.
pub struct GuestsClient {
    transport: Arc<dyn ApiTransport>,
}

impl GuestsClient {
    /// Create a new guests client.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    fn collection(space_id: &str) -> String {
        format!("/spaces/{}/guests", segment(space_id))
    }

    fn member(space_id: &str, guest_id: &str) -> String {
        format!("{}/{}", Self::collection(space_id), segment(guest_id))
    }

    /// Add a guest to a space.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Conflict` if the email is already on the list, or
    /// `ApiError::Validation` if the payload is rejected.
    pub async fn add(&self, space_id: &str, guest: &NewGuest) -> Result<Guest> {
        let request = ApiRequest::post(Self::collection(space_id), guest)?;
        decode(self.transport.send(&request).await?)
    }

    /// List the guests of a space.
    ///
    /// # Errors
    ///
    /// Returns an error if the space is not found.
    pub async fn list(&self, space_id: &str) -> Result<Vec<Guest>> {
        let request = ApiRequest::get(Self::collection(space_id));
        decode_list(self.transport.send(&request).await?, "guests")
    }

    /// Change a guest's role or permissions.
    ///
    /// # Errors
    ///
    /// Returns an error if the guest is not found or the update is rejected.
    pub async fn update(
        &self,
        space_id: &str,
        guest_id: &str,
        update: &GuestUpdate,
    ) -> Result<Guest> {
        let request = ApiRequest::put(Self::member(space_id, guest_id), update)?;
        decode(self.transport.send(&request).await?)
    }

    /// Remove a guest from a space.
    ///
    /// # Errors
    ///
    /// Returns an error if the guest is not found.
    pub async fn remove(&self, space_id: &str, guest_id: &str) -> Result<()> {
        let request = ApiRequest::delete(Self::member(space_id, guest_id));
        self.transport.send(&request).await?;
        Ok(())
    }

    /// Add many guests, throttled by `batch`.
    ///
    /// Individual failures are collected in the report rather than aborting
    /// the run. There is no cancellation: the call returns once every batch
    /// has been attempted.
    pub async fn add_many(
        &self,
        space_id: &str,
        guests: &[NewGuest],
        batch: &BatchConfig,
    ) -> BatchReport {
        let batch_size = batch.batch_size.max(1);
        let total_batches = guests.len().div_ceil(batch_size);
        let mut report = BatchReport::default();

        for (index, chunk) in guests.chunks(batch_size).enumerate() {
            if index > 0 && !batch.delay.is_zero() {
                tokio::time::sleep(batch.delay).await;
            }

            tracing::debug!(
                space_id,
                batch = index + 1,
                total_batches,
                size = chunk.len(),
                "Adding guest batch"
            );

            let results = join_all(chunk.iter().map(|guest| self.add(space_id, guest))).await;

            for (guest, result) in chunk.iter().zip(results) {
                match result {
                    Ok(added) => report.added.push(added),
                    Err(error) => {
                        tracing::warn!(
                            space_id,
                            email = %guest.email,
                            error = %error,
                            "Failed to add guest"
                        );
                        report.failed.push(BatchFailure {
                            email: guest.email.clone(),
                            error,
                        });
                    }
                }
            }
        }

        report
    }
}
