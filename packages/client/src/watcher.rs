//! Poller side of the contract: fetch the latest position on a fixed cadence.

use std::time::Duration;

use crate::{
    api::{LocshareClient, TrackedLocation},
    error::ClientError,
};

/// Why watching stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEnd {
    /// The session does not exist (any more)
    SessionGone,
    /// The requested number of polls was reached
    PollLimitReached,
}

/// Poll `tracking_id` every `interval` and call `on_update` whenever a new
/// position appears.
///
/// Transient errors are logged and polling continues. A 404 ends the watch.
pub async fn run_watcher<F>(
    client: &LocshareClient,
    tracking_id: &str,
    interval: Duration,
    max_polls: Option<u64>,
    mut on_update: F,
) -> WatchEnd
where
    F: FnMut(&TrackedLocation),
{
    let mut ticker = tokio::time::interval(interval);
    let mut last_seen: Option<TrackedLocation> = None;
    let mut polls = 0u64;

    while max_polls.is_none_or(|max| polls < max) {
        ticker.tick().await;
        polls += 1;

        match client.get_location(tracking_id).await {
            Ok(Some(location)) => {
                if last_seen.as_ref() != Some(&location) {
                    on_update(&location);
                    last_seen = Some(location);
                }
            }
            Ok(None) => tracing::debug!("No location shared yet"),
            Err(ClientError::SessionNotFound) => {
                tracing::info!(tracking_id, "Session not found, stopping");
                return WatchEnd::SessionGone;
            }
            Err(e) => tracing::warn!("Failed to fetch location: {}", e),
        }
    }

    WatchEnd::PollLimitReached
}
