//! HTTP server: router, handlers, middleware and process lifecycle.

pub mod error;
mod handler;
pub mod middleware;
pub mod router;
mod runner;
mod signal;
pub mod state;

pub use router::build_router;
pub use runner::run;
