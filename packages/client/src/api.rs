//! HTTP API client.

use chrono::{DateTime, Utc};
use locshare_shared::contract::{SAMPLE_TIMEOUT, SEND_LINK_PATH, location_path};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Links issued for a phone number
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedLink {
    pub tracking_id: String,
    pub share_link: String,
    pub whatsapp_link: String,
}

/// Latest position of a session as reported by the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
struct LocationEnvelope {
    location: Option<TrackedLocation>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendLinkBody<'a> {
    phone_number: &'a str,
}

#[derive(Serialize)]
struct LocationBody {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone)]
pub struct LocshareClient {
    http: reqwest::Client,
    base_url: String,
}

impl LocshareClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create (or fetch the existing) share link for a phone number.
    pub async fn send_link(&self, phone_number: &str) -> Result<SharedLink, ClientError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, SEND_LINK_PATH))
            .json(&SendLinkBody { phone_number })
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Latest location of a session, `None` until the first update.
    pub async fn get_location(
        &self,
        tracking_id: &str,
    ) -> Result<Option<TrackedLocation>, ClientError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, location_path(tracking_id)))
            .send()
            .await?;

        let envelope: LocationEnvelope = check(response).await?.json().await?;
        Ok(envelope.location)
    }

    /// Publish one sample. The request is bounded by the sample timeout.
    pub async fn put_location(
        &self,
        tracking_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, location_path(tracking_id)))
            .timeout(SAMPLE_TIMEOUT)
            .json(&LocationBody {
                latitude,
                longitude,
            })
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}

/// Turn non-success responses into [`ClientError`]s
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.json::<ErrorBody>().await.ok();
    if status == StatusCode::NOT_FOUND
        && body.as_ref().is_none_or(|b| b.error == "not_found")
    {
        return Err(ClientError::SessionNotFound);
    }

    let (reason, message) = body
        .map(|b| (b.error, b.message))
        .unwrap_or_else(|| ("unknown".to_string(), String::new()));
    Err(ClientError::Api {
        status: status.as_u16(),
        reason,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        // テスト項目: ベース URL 末尾のスラッシュは除去される
        let client = LocshareClient::new("http://localhost:3000/");

        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_location_envelope_parsing() {
        // テスト項目: location が null のレスポンスと値ありのレスポンスを解釈できる
        let empty: LocationEnvelope = serde_json::from_str(r#"{"location":null}"#).unwrap();
        assert!(empty.location.is_none());

        let filled: LocationEnvelope = serde_json::from_str(
            r#"{"location":{"latitude":12.5,"longitude":77.25,"timestamp":"2024-05-01T12:30:00.000Z"}}"#,
        )
        .unwrap();
        let location = filled.location.unwrap();
        assert_eq!(location.latitude, 12.5);
        assert_eq!(location.longitude, 77.25);
        assert_eq!(location.timestamp.to_rfc3339(), "2024-05-01T12:30:00+00:00");
    }
}
