//! Route table.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::ui::{
    handler::{
        get_latest_location, get_location, health_check, send_link, track_page, update_location,
    },
    middleware::{RateLimiter, rate_limit},
    state::AppState,
};

/// Build the application router.
///
/// Everything under `/api` goes through the rate limiter. The router must be
/// served with `into_make_service_with_connect_info::<SocketAddr>()` so the
/// limiter can see peer addresses.
pub fn build_router(state: Arc<AppState>, limiter: Arc<RateLimiter>) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route("/auth/send-link", post(send_link))
        .route(
            "/auth/location/{tracking_id}",
            get(get_location).post(update_location),
        )
        .route("/location/{tracking_id}", get(get_latest_location))
        .layer(middleware::from_fn_with_state(limiter, rate_limit));

    Router::new()
        .nest("/api", api)
        .route("/track-location/{tracking_id}", get(track_page))
        .route("/share-location/{tracking_id}", get(track_page))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
