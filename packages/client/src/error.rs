use thiserror::Error;

/// Client-side errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or undecodable response
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request
    #[error("server returned {status} ({reason}): {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    /// The tracking ID does not (or no longer) exist
    #[error("session not found")]
    SessionNotFound,

    /// A sample line could not be parsed
    #[error("invalid sample {0:?}: expected \"<latitude>,<longitude>\"")]
    InvalidSample(String),

    #[error("failed to read samples: {0}")]
    Io(#[from] std::io::Error),
}
