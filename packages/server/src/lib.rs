//! Location sharing session server.
//!
//! Issues per-phone tracking sessions, stores the latest reported location
//! for each, and serves it back to pollers over HTTP.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::run as run_server;
