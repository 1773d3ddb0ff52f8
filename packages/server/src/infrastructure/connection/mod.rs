//! Session store connection management.
//!
//! Request handlers never hold a connection themselves: they go through
//! [`ConnectionManager::current`], which either hands out the live handle or
//! fails fast while the store is unreachable.

pub mod inmemory;
pub mod manager;
pub mod postgres;

pub use inmemory::InMemoryConnector;
pub use manager::{
    ConnectionControl, ConnectionError, ConnectionManager, ConnectionSettings, ConnectionState,
    Connector,
};
pub use postgres::{DEFAULT_MAX_CONNECTIONS, PgConnector};
