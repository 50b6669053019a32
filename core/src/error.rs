//! Error types for the sans-IO API core.
//!
//! # Design
//! Every non-2xx response lands in `Status` with the raw status code and body;
//! callers who care about 404 use `is_not_found` instead of a dedicated
//! variant, so the status code is always available for reporting.

use thiserror::Error;

/// Errors returned by `ApiCore` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `ApiCore` was constructed with an empty base URL.
    #[error("base URL must not be empty")]
    EmptyBaseUrl,

    /// The server answered with a status outside 200..=299.
    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    /// The response body is not valid JSON for the requested type.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ApiError {
    /// Status code of a `Status` error, `None` for every other kind.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Decode(_))
    }
}
