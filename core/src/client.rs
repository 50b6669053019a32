//! Stateless HTTP request builder and response parser for the JSON API.
//!
//! # Design
//! `ApiCore` holds only a `base_url` and carries no mutable state between
//! calls. `build_request` produces an `HttpRequest`, `parse_response` consumes
//! an `HttpResponse`. The caller executes the actual HTTP round-trip, keeping
//! the core deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{
    merge_headers, HttpMethod, HttpRequest, HttpResponse, RequestOptions, CONTENT_TYPE,
    JSON_CONTENT_TYPE,
};

/// Synchronous, stateless core of the API client.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCore {
    base_url: String,
}

impl ApiCore {
    /// Create a core bound to `base_url`.
    ///
    /// The base URL is stored verbatim; endpoints are later appended to it
    /// without inserting or removing any `/`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(ApiError::EmptyBaseUrl);
        }
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for `endpoint`: plain concatenation onto the base URL.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Build a request for `endpoint` with JSON defaults.
    ///
    /// Method defaults to GET. `Content-Type: application/json` is always
    /// present unless `options.headers` carries its own `Content-Type`.
    pub fn build_request(&self, endpoint: &str, options: RequestOptions) -> HttpRequest {
        HttpRequest {
            method: options.method.unwrap_or_default(),
            url: self.url(endpoint),
            headers: merge_headers(&[(CONTENT_TYPE, JSON_CONTENT_TYPE)], options.headers),
            body: options.body,
        }
    }

    pub fn build_get(&self, endpoint: &str) -> HttpRequest {
        self.build_request(endpoint, RequestOptions::new())
    }

    pub fn build_post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        data: &B,
    ) -> Result<HttpRequest, ApiError> {
        self.build_with_json_body(HttpMethod::Post, endpoint, data)
    }

    pub fn build_put<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        data: &B,
    ) -> Result<HttpRequest, ApiError> {
        self.build_with_json_body(HttpMethod::Put, endpoint, data)
    }

    pub fn build_delete(&self, endpoint: &str) -> HttpRequest {
        self.build_request(endpoint, RequestOptions::new().method(HttpMethod::Delete))
    }

    fn build_with_json_body<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        data: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(data).map_err(ApiError::Serialize)?;
        Ok(self.build_request(endpoint, RequestOptions::new().method(method).body(body)))
    }

    /// Check the status of `response` and decode its body into `T`.
    ///
    /// `T` is trusted: whatever shape the caller asks for is what serde tries
    /// to produce. Decode into `serde_json::Value` to accept any JSON.
    pub fn parse_response<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<T, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(ApiError::Decode)
    }
}

/// Map any status outside 200..=299 to `ApiError::Status`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}
