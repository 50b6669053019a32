//! Async JSON API client.
//!
//! # Overview
//! Runs the requests that `api-core` builds over the network with reqwest and
//! hands the responses back to `api-core` for status checking and decoding.
//!
//! # Design
//! - `ApiClient::request` is the only path to the network; `get`, `post`,
//!   `put` and `delete` fix its method and body, and the typed backend calls
//!   in `endpoints` sit on top of those.
//! - The base URL is injected at construction, normally from
//!   `RuntimeConfig::load()`, so tests can point a client at a mock server.
//! - Failures are logged with `tracing` and then returned unchanged; this
//!   crate never installs a subscriber.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use api_core::{
    ApiError, DocumentResponse, ExtractionResult, HelloMessage, HttpMethod, MetricsResponse,
    RagQuery, RequestOptions,
};
pub use client::ApiClient;
pub use config::{RuntimeConfig, API_BASE_ENV, DEFAULT_API_BASE};
pub use error::ClientError;
