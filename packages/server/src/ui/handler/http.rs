//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, Path, State},
};

use crate::{
    infrastructure::dto::http::{
        HealthDto, LocationDto, LocationEnvelopeDto, MessageDto, SendLinkRequest,
        SendLinkResponse, UpdateLocationRequest,
    },
    ui::{error::ApiError, state::AppState},
};

/// JSON body extractor whose rejections are reported as [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        store: state.connection.state().to_string(),
    })
}

/// Create (or reuse) the session of a phone number and return its links
pub async fn send_link(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SendLinkRequest>,
) -> Result<Json<SendLinkResponse>, ApiError> {
    let issued = state
        .create_or_get_link()
        .execute(request.phone_number)
        .await?;

    tracing::info!(
        tracking_id = %issued.session.tracking_id,
        "Generated location sharing link"
    );

    Ok(Json(SendLinkResponse {
        message: "Location sharing link generated successfully".to_string(),
        tracking_id: issued.session.tracking_id.into_string(),
        share_link: issued.share_link,
        whatsapp_link: issued.whatsapp_link,
    }))
}

/// Latest location of a session; `location` is null until the first update
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(tracking_id): Path<String>,
) -> Result<Json<LocationEnvelopeDto>, ApiError> {
    let location = state.get_location().execute(tracking_id).await?;

    Ok(Json(LocationEnvelopeDto {
        location: location.as_ref().map(LocationDto::from),
    }))
}

/// Overwrite the location of a session
pub async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(tracking_id): Path<String>,
    ApiJson(request): ApiJson<UpdateLocationRequest>,
) -> Result<Json<MessageDto>, ApiError> {
    state
        .update_location()
        .execute(tracking_id, request.latitude, request.longitude)
        .await?;

    Ok(Json(MessageDto {
        message: "Location updated successfully".to_string(),
    }))
}

/// Latest location as a bare object; 404 both for unknown sessions and sessions without location
pub async fn get_latest_location(
    State(state): State<Arc<AppState>>,
    Path(tracking_id): Path<String>,
) -> Result<Json<LocationDto>, ApiError> {
    let location = state
        .get_location()
        .execute(tracking_id)
        .await?
        .ok_or_else(ApiError::location_not_found)?;

    Ok(Json(LocationDto::from(&location)))
}
