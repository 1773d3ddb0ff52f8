//! Poller/Publisher contract.
//!
//! Both sides of a location share agree on these values. The publisher
//! pushes every fresh sample; the viewer polls on a fixed cadence. Every
//! update overwrites the previous one, so duplicated or slightly reordered
//! samples are harmless.

use std::time::Duration;

/// How often a viewer polls for the latest position.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Upper bound for acquiring and sending a single position sample.
pub const SAMPLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Publishers must not reuse a cached fix.
pub const MAX_SAMPLE_AGE: Duration = Duration::ZERO;

/// Path of the endpoint used to create or fetch a share link.
pub const SEND_LINK_PATH: &str = "/api/auth/send-link";

/// Path of the read/write endpoint for a session's location.
pub fn location_path(tracking_id: &str) -> String {
    format!("/api/auth/location/{tracking_id}")
}

/// Path of the page handed to the party whose location is shared.
pub fn track_page_path(tracking_id: &str) -> String {
    format!("/track-location/{tracking_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        // テスト項目: tracking ID を埋め込んだパスが生成される
        assert_eq!(location_path("abc"), "/api/auth/location/abc");
        assert_eq!(track_page_path("abc"), "/track-location/abc");
    }
}
