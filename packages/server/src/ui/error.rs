//! API error type and its JSON response.

use std::time::Duration;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    infrastructure::dto::http::ErrorDto,
    usecase::{CreateLinkError, LocationError},
};

/// Stable machine-readable error reasons
pub mod reason {
    pub const INVALID_PHONE_NUMBER: &str = "invalid_phone_number";
    pub const INVALID_COORDINATES: &str = "invalid_coordinates";
    pub const INVALID_BODY: &str = "invalid_body";
    pub const NOT_FOUND: &str = "not_found";
    pub const LOCATION_NOT_FOUND: &str = "location_not_found";
    pub const STORE_UNAVAILABLE: &str = "store_unavailable";
    pub const RATE_LIMITED: &str = "rate_limited";
}

/// API-level error that can be converted to an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub reason: &'static str,
    pub message: String,
    pub retry_after: Option<Duration>,
}

impl ApiError {
    pub fn new(status: StatusCode, reason: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            reason,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, reason::NOT_FOUND, "Invalid tracking ID")
    }

    pub fn location_not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            reason::LOCATION_NOT_FOUND,
            "Location not found",
        )
    }

    pub fn store_unavailable() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            reason::STORE_UNAVAILABLE,
            "Session store is unavailable, please retry",
        )
    }

    pub fn rate_limited(retry_after: Duration) -> Self {
        Self {
            retry_after: Some(retry_after),
            ..Self::new(
                StatusCode::TOO_MANY_REQUESTS,
                reason::RATE_LIMITED,
                "Too many requests, please try again later",
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorDto {
            error: self.reason.to_string(),
            message: self.message,
        };
        let mut response = (self.status, Json(body)).into_response();

        if let Some(retry_after) = self.retry_after {
            // Round up so clients never retry before the window resets
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            reason::INVALID_BODY,
            rejection.body_text(),
        )
    }
}

impl From<CreateLinkError> for ApiError {
    fn from(err: CreateLinkError) -> Self {
        match err {
            CreateLinkError::InvalidPhoneNumber(_) => Self::new(
                StatusCode::BAD_REQUEST,
                reason::INVALID_PHONE_NUMBER,
                "Invalid phone number",
            ),
            CreateLinkError::StoreUnavailable(detail) => {
                tracing::error!(%detail, "Failed to generate location sharing link");
                Self::store_unavailable()
            }
        }
    }
}

impl From<LocationError> for ApiError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::InvalidCoordinates(detail) => Self::new(
                StatusCode::BAD_REQUEST,
                reason::INVALID_COORDINATES,
                detail.to_string(),
            ),
            LocationError::NotFound => Self::not_found(),
            LocationError::StoreUnavailable(detail) => {
                tracing::error!(%detail, "Location request failed");
                Self::store_unavailable()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValueObjectError;

    #[test]
    fn test_rate_limited_sets_retry_after() {
        // テスト項目: 429 応答に切り上げた Retry-After ヘッダが付く
        let response = ApiError::rate_limited(Duration::from_millis(1500)).into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "2");
    }

    #[test]
    fn test_location_error_mapping() {
        // テスト項目: UseCase のエラーが適切なステータスと理由に変換される
        let invalid = ApiError::from(LocationError::InvalidCoordinates(
            ValueObjectError::LatitudeOutOfRange(100.0),
        ));
        let not_found = ApiError::from(LocationError::NotFound);
        let unavailable = ApiError::from(LocationError::StoreUnavailable("down".to_string()));

        assert_eq!(
            (invalid.status, invalid.reason),
            (StatusCode::BAD_REQUEST, reason::INVALID_COORDINATES)
        );
        assert_eq!(
            (not_found.status, not_found.reason),
            (StatusCode::NOT_FOUND, reason::NOT_FOUND)
        );
        assert_eq!(
            (unavailable.status, unavailable.reason),
            (StatusCode::INTERNAL_SERVER_ERROR, reason::STORE_UNAVAILABLE)
        );
    }
}
