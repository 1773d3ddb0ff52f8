//! HTTP API request/response DTOs for the location sharing service.
//!
//! Field names are camelCase on the wire for compatibility with existing
//! browser clients.

use serde::{Deserialize, Serialize};

use crate::domain::Location;
use locshare_shared::time::to_rfc3339_millis;

/// Body of `POST /api/auth/send-link`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendLinkRequest {
    /// Missing values are reported as an invalid phone number, not a malformed body
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Response of `POST /api/auth/send-link`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendLinkResponse {
    pub message: String,
    pub tracking_id: String,
    pub share_link: String,
    pub whatsapp_link: String,
}

/// Body of `POST /api/auth/location/{tracking_id}`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UpdateLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// Wire shape of a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationDto {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String, // ISO 8601
}

impl From<&Location> for LocationDto {
    fn from(location: &Location) -> Self {
        Self {
            latitude: location.coordinates.latitude(),
            longitude: location.coordinates.longitude(),
            timestamp: to_rfc3339_millis(&location.timestamp),
        }
    }
}

/// Response of `GET /api/auth/location/{tracking_id}`; `location` is null until the first update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationEnvelopeDto {
    pub location: Option<LocationDto>,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

/// Error body: stable machine-readable reason plus a human message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
    pub message: String,
}

/// Response of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    /// Connection state of the session store
    pub store: String,
}
