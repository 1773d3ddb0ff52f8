//! Handler modules for the JSON API and the tracking pages.

pub mod http;
pub mod page;

// Re-export HTTP handlers
pub use http::{get_latest_location, get_location, health_check, send_link, update_location};

// Re-export page handlers
pub use page::track_page;
