//! Shared utilities for the location sharing server and client.

pub mod contract;
pub mod logger;
pub mod time;
