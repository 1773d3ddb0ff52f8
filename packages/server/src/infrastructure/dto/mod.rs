//! Data transfer objects exchanged over the wire.

pub mod http;
