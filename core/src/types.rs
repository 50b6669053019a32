//! DTOs for the backend's JSON endpoints.
//!
//! # Design
//! These types mirror the backend's schema but are defined independently from
//! the mock-server crate. Integration tests catch any schema drift between the
//! two.

use serde::{Deserialize, Serialize};

/// Body of `GET /hello`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HelloMessage {
    pub message: String,
}

/// One extracted attribute, as produced by the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionResult {
    pub attribute: String,
    pub value: String,
    pub source: String,
    pub latency: f64,
    #[serde(default)]
    pub ground_truth: Option<String>,
    #[serde(default)]
    pub is_success: bool,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub is_not_found: bool,
    #[serde(default)]
    pub is_rate_limit: bool,
    #[serde(default)]
    pub exact_match: Option<bool>,
    #[serde(default)]
    pub case_insensitive_match: Option<bool>,
}

/// Request payload for `POST /extract/metrics`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsRequest {
    pub results: Vec<ExtractionResult>,
}

/// Aggregate metrics over a batch of extraction results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsResponse {
    pub total_fields: i64,
    pub success_count: i64,
    pub error_count: i64,
    pub not_found_count: i64,
    pub rate_limit_count: i64,
    pub exact_match_count: i64,
    pub case_insensitive_match_count: i64,
    pub accuracy_denominator: i64,
    pub success_rate: f64,
    pub error_rate: f64,
    pub not_found_rate: f64,
    pub rate_limit_rate: f64,
    pub exact_match_accuracy: f64,
    pub case_insensitive_accuracy: f64,
    pub avg_latency: f64,
}

/// Request payload for `POST /rag/query`. Omitting `n_results` lets the server
/// pick its default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RagQuery {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_results: Option<u32>,
}

impl RagQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            n_results: None,
        }
    }

    pub fn with_limit(mut self, n_results: u32) -> Self {
        self.n_results = Some(n_results);
        self
    }
}

/// A retrieved document chunk and its metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentResponse {
    pub text: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}
