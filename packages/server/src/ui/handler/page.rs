//! Tracking page handler.
//!
//! The page itself is presentation glue: it samples the device position and
//! posts every fix to the location endpoint. Only the existence check of the
//! session is part of the service.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use locshare_shared::contract::{MAX_SAMPLE_AGE, SAMPLE_TIMEOUT, location_path};

use crate::{domain::TrackingId, ui::state::AppState};

/// Serve the location sharing page for an existing session
pub async fn track_page(
    State(state): State<Arc<AppState>>,
    Path(tracking_id): Path<String>,
) -> Response {
    let Ok(tracking_id) = TrackingId::new(tracking_id) else {
        return (StatusCode::NOT_FOUND, "Invalid tracking ID").into_response();
    };

    match state.repository.find_by_tracking_id(&tracking_id).await {
        Ok(Some(session)) => Html(render_track_page(&session.tracking_id)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Invalid tracking ID").into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Error serving tracking page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

fn render_track_page(tracking_id: &TrackingId) -> String {
    // The tracking ID was found in the store, so it is one we issued (hex only)
    let endpoint = location_path(tracking_id.as_str());
    let timeout_ms = SAMPLE_TIMEOUT.as_millis();
    let maximum_age_ms = MAX_SAMPLE_AGE.as_millis();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Share Your Location</title>
</head>
<body>
<h1>Share Your Location</h1>
<p>Latitude: <span id="latitude">-</span></p>
<p>Longitude: <span id="longitude">-</span></p>
<p id="status"></p>
<script>
const endpoint = "{endpoint}";
function show(id, text) {{ document.getElementById(id).textContent = text; }}
function publish(position) {{
  const {{ latitude, longitude }} = position.coords;
  show("latitude", latitude.toFixed(6));
  show("longitude", longitude.toFixed(6));
  fetch(endpoint, {{
    method: "POST",
    headers: {{ "Content-Type": "application/json" }},
    body: JSON.stringify({{ latitude, longitude }})
  }}).catch((err) => show("status", "Failed to send location: " + err));
}}
if (navigator.geolocation) {{
  navigator.geolocation.watchPosition(publish, (err) => show("status", err.message), {{
    enableHighAccuracy: true,
    timeout: {timeout_ms},
    maximumAge: {maximum_age_ms}
  }});
}} else {{
  show("status", "Geolocation is not supported by your browser");
}}
</script>
</body>
</html>
"#
    )
}
