//! Infrastructure layer: store connections, store backends, DTOs and link builders.

pub mod connection;
pub mod dto;
pub mod link;
pub mod repository;
pub mod store;
