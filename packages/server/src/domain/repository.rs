//! Session store contract.
//!
//! The domain defines the trait; infrastructure provides the implementations
//! (dependency inversion). Use cases only ever see `dyn SessionRepository`.

use async_trait::async_trait;

use super::{Coordinates, PhoneNumber, RepositoryError, Session, TrackingId};

/// Result of an insert that may race with another creator.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// The session was inserted by this call
    Created(Session),
    /// A session with the same phone number or tracking ID already exists
    Conflict,
}

/// Durable mapping from phone number / tracking ID to the latest location.
///
/// Implementations enforce global uniqueness of both keys and never expose a
/// partially written location.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Look up a session by phone number
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Session>, RepositoryError>;

    /// Look up a session by tracking ID
    async fn find_by_tracking_id(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<Option<Session>, RepositoryError>;

    /// Insert a new session without location.
    ///
    /// Never overwrites: an existing phone number or tracking ID yields
    /// `CreateOutcome::Conflict`.
    async fn create_session(
        &self,
        phone: &PhoneNumber,
        tracking_id: &TrackingId,
    ) -> Result<CreateOutcome, RepositoryError>;

    /// Atomically replace the location of a session and bump `updated_at`.
    ///
    /// # Errors
    ///
    /// `RepositoryError::NotFound` if no session owns `tracking_id`.
    async fn update_location(
        &self,
        tracking_id: &TrackingId,
        coordinates: Coordinates,
    ) -> Result<Session, RepositoryError>;
}
