//! Typed calls for the backend's own endpoints.

use api_core::{
    DocumentResponse, ExtractionResult, HelloMessage, MetricsRequest, MetricsResponse, RagQuery,
};

use crate::client::ApiClient;
use crate::error::ClientError;

impl ApiClient {
    /// `GET /hello`
    pub async fn hello(&self) -> Result<HelloMessage, ClientError> {
        self.get("/hello").await
    }

    /// `POST /extract/metrics`: aggregate success, error and accuracy figures
    /// over a batch of extraction results.
    pub async fn calculate_metrics(
        &self,
        results: &[ExtractionResult],
    ) -> Result<MetricsResponse, ClientError> {
        let request = MetricsRequest {
            results: results.to_vec(),
        };
        self.post("/extract/metrics", &request).await
    }

    /// `POST /rag/query`: document chunks matching `query.text`.
    pub async fn query_documents(
        &self,
        query: &RagQuery,
    ) -> Result<Vec<DocumentResponse>, ClientError> {
        self.post("/rag/query", query).await
    }
}
