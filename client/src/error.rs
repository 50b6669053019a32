//! Errors surfaced by `ApiClient`.

use api_core::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: DNS, refused connection, TLS, or the body stream
    /// breaking while it was read.
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// A caller-supplied header that cannot be put on the wire.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Status, decode and serialization failures from the core, unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ClientError {
    /// Status code when the server answered outside 200..=299.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ClientError::Api(err) if err.is_decode())
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}
