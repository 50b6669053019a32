//! Sans-IO core for the JSON API client.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The `api-client` crate runs
//! the actual HTTP round-trip; tests can use any blocking client instead.
//!
//! # Design
//! - `ApiCore` holds only the base URL, fixed at construction.
//! - `build_request` + `parse_response` are the single request path; the
//!   `build_get` / `build_post` / `build_put` / `build_delete` helpers only
//!   fill in fixed options.
//! - Response payloads are caller-asserted: `parse_response::<T>` decodes
//!   into whatever `T` the caller names and performs no further validation.
//! - Backend DTOs live in `types` and are defined independently from the
//!   mock-server crate; integration tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::ApiCore;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions, JSON_CONTENT_TYPE};
pub use types::{
    DocumentResponse, ExtractionResult, HelloMessage, MetricsRequest, MetricsResponse, RagQuery,
};
