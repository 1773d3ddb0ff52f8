//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueObjectError {
    /// PhoneNumber format error (must be exactly 10 ASCII digits)
    #[error("{0} is not a valid phone number")]
    PhoneNumberInvalidFormat(String),

    /// TrackingId validation error
    #[error("TrackingId cannot be empty")]
    TrackingIdEmpty,

    /// TrackingId too long error
    #[error("TrackingId cannot exceed {max} characters (got {actual})")]
    TrackingIdTooLong { max: usize, actual: usize },

    /// Latitude outside [-90, 90] or not a finite number
    #[error("latitude must be a finite number between -90 and 90 (got {0})")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180] or not a finite number
    #[error("longitude must be a finite number between -180 and 180 (got {0})")]
    LongitudeOutOfRange(f64),
}

/// Errors reported by a session store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No session owns the given tracking ID
    #[error("session not found")]
    NotFound,

    /// The store cannot serve the call right now (not connected, timeout or pool exhausted)
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// The connection to the store broke during the call
    #[error("session store connection lost: {0}")]
    ConnectionLost(String),

    /// The store was reachable but rejected or failed the operation
    #[error("session store query failed: {0}")]
    Query(String),
}
