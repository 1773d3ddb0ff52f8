//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use chrono::{DateTime, Utc};
use std::fmt;

use super::error::ValueObjectError;

/// Number of digits in a phone number.
pub const PHONE_NUMBER_DIGITS: usize = 10;

/// Upper bound on the length of a tracking ID accepted from the outside.
pub const TRACKING_ID_MAX_LEN: usize = 128;

/// Phone number of the party a location is requested from.
///
/// Exactly ten ASCII digits, without country code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a new PhoneNumber.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw phone number string
    ///
    /// # Returns
    ///
    /// A Result containing the PhoneNumber or an error if it is not exactly 10 digits
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let valid =
            value.len() == PHONE_NUMBER_DIGITS && value.bytes().all(|b| b.is_ascii_digit());
        if !valid {
            return Err(ValueObjectError::PhoneNumberInvalidFormat(value));
        }
        Ok(Self(value))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Phone number with all but the last four digits hidden, for logs.
    pub fn masked(&self) -> String {
        let visible = &self.0[PHONE_NUMBER_DIGITS - 4..];
        format!("******{visible}")
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

/// Tracking identifier.
///
/// The capability token that grants read/write access to a session's location.
/// Issued values are 32 lowercase hex characters, but any non-empty string of
/// bounded length is accepted for lookups so that unknown IDs surface as "not found".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackingId(String);

impl TrackingId {
    /// Create a new TrackingId.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::TrackingIdEmpty);
        }
        let len = id.len();
        if len > TRACKING_ID_MAX_LEN {
            return Err(ValueObjectError::TrackingIdTooLong {
                max: TRACKING_ID_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Wrap an ID produced by `TrackingIdFactory`, which is always 32 hex characters.
    pub(crate) fn from_generated(id: String) -> Self {
        Self(id)
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geographic position. Both coordinates always travel together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create new Coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not finite or lies outside the
    /// valid geographic range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValueObjectError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ValueObjectError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValueObjectError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Latest known position of a session together with the time it was recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub coordinates: Coordinates,
    pub timestamp: DateTime<Utc>,
}

impl Location {
    pub fn new(coordinates: Coordinates, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinates,
            timestamp,
        }
    }
}
