//! Core domain models for the location sharing service.

use chrono::{DateTime, Utc};

use super::value_object::{Coordinates, Location, PhoneNumber, TrackingId};

/// Links a phone number, its tracking ID and the latest known location.
///
/// A session is created lazily the first time a link is requested for a phone
/// number and is only mutated by location updates, which replace the location
/// wholesale. No history is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Phone number of the location sender (unique)
    pub phone_number: PhoneNumber,
    /// Capability token used to read and write the location (unique, immutable)
    pub tracking_id: TrackingId,
    /// Latest known location, absent until the first update
    pub location: Option<Location>,
    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last write to the record
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session without a location
    pub fn new(phone_number: PhoneNumber, tracking_id: TrackingId, now: DateTime<Utc>) -> Self {
        Self {
            phone_number,
            tracking_id,
            location: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the location (last write wins) and bump `updated_at`
    pub fn update_location(&mut self, coordinates: Coordinates, now: DateTime<Utc>) -> Location {
        let location = Location::new(coordinates, now);
        self.location = Some(location);
        self.updated_at = now;
        location
    }
}
