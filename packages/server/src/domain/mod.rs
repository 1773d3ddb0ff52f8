//! Domain layer for the location sharing service.
//!
//! This module contains business rules that are independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::Session;
pub use error::{RepositoryError, ValueObjectError};
pub use factory::TrackingIdFactory;
pub use repository::{CreateOutcome, SessionRepository};
pub use value_object::{Coordinates, Location, PhoneNumber, TrackingId};
