//! Command-line client for the location sharing server.
//!
//! Implements both sides of the poller/publisher contract: a publisher that
//! pushes position samples and a watcher that polls for the latest one.

pub mod api;
pub mod error;
pub mod publisher;
pub mod watcher;

pub use api::{LocshareClient, SharedLink, TrackedLocation};
pub use error::ClientError;
pub use publisher::{PublishSummary, Sample, parse_sample, run_fixed_publisher, run_publisher};
pub use watcher::{WatchEnd, run_watcher};
