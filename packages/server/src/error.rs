//! Top-level server errors.

use std::{io, net::SocketAddr};

use thiserror::Error;

use crate::infrastructure::connection::ConnectionError;

/// Errors that stop the server from starting or serving
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Session store settings rejected before the first connection attempt
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Listener could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The HTTP server failed while running
    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}
