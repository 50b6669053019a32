//! End-to-end runs of `ApiClient` against the mock backend on a random port.

use api_client::{
    ApiClient, ExtractionResult, HttpMethod, RagQuery, RequestOptions, RuntimeConfig,
};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u64,
    name: String,
}

async fn start_server() -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));

    let config = RuntimeConfig::from_lookup(|key| {
        (key == api_client::API_BASE_ENV).then(|| format!("http://{addr}/api"))
    });
    ApiClient::from_config(&config).unwrap()
}

fn extraction(attribute: &str, flags: &[&str], latency: f64) -> ExtractionResult {
    ExtractionResult {
        attribute: attribute.to_string(),
        value: "x".to_string(),
        source: "pdf".to_string(),
        latency,
        ground_truth: None,
        is_success: flags.contains(&"success"),
        is_error: flags.contains(&"error"),
        is_not_found: flags.contains(&"not_found"),
        is_rate_limit: false,
        exact_match: flags.contains(&"exact").then_some(true),
        case_insensitive_match: flags.contains(&"ci").then_some(true),
    }
}

#[tokio::test]
async fn users_lifecycle() {
    let client = start_server().await;

    // The seeded user.
    let ana: User = client.get("/users/1").await.unwrap();
    assert_eq!(
        ana,
        User {
            id: 1,
            name: "Ana".to_string()
        }
    );

    // Create.
    let created: User = client.post("/users", &json!({"name": "Bo"})).await.unwrap();
    assert_eq!(created.name, "Bo");
    let id = created.id;

    // List.
    let users: Vec<User> = client.get("/users").await.unwrap();
    assert_eq!(users.len(), 2);

    // Replace.
    let replaced: User = client
        .put(&format!("/users/{id}"), &json!({"name": "Bea"}))
        .await
        .unwrap();
    assert_eq!(replaced.name, "Bea");

    // Delete answers with the removed user.
    let removed: User = client.delete(&format!("/users/{id}")).await.unwrap();
    assert_eq!(
        removed,
        User {
            id,
            name: "Bea".to_string()
        }
    );

    // Gone.
    let err = client.get::<User>(&format!("/users/{id}")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn hello_endpoint() {
    let client = start_server().await;
    let hello = client.hello().await.unwrap();
    assert_eq!(hello.message, "Hello from the mock API!");
}

#[tokio::test]
async fn metrics_endpoint() {
    let client = start_server().await;
    let results = vec![
        extraction("Colour", &["success", "exact", "ci"], 1.0),
        extraction("Gender", &["success", "ci"], 2.0),
        extraction("Sealing", &["not_found"], 3.0),
        extraction("Width [MM]", &["error"], 6.0),
    ];

    let metrics = client.calculate_metrics(&results).await.unwrap();
    assert_eq!(metrics.total_fields, 4);
    assert_eq!(metrics.success_count, 2);
    assert_eq!(metrics.accuracy_denominator, 3);
    assert_eq!(metrics.success_rate, 0.5);
    assert_eq!(metrics.error_rate, 0.25);
    assert_eq!(metrics.avg_latency, 3.0);
    assert!((metrics.case_insensitive_accuracy - 2.0 / 3.0).abs() < 1e-12);
}

#[tokio::test]
async fn metrics_for_empty_batch() {
    let client = start_server().await;
    let metrics = client.calculate_metrics(&[]).await.unwrap();
    assert_eq!(metrics.total_fields, 0);
    assert_eq!(metrics.avg_latency, 0.0);
}

#[tokio::test]
async fn rag_query_endpoint() {
    let client = start_server().await;

    let docs = client
        .query_documents(&RagQuery::new("temperature"))
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].metadata["source"], "datasheet-a.pdf");

    let docs = client
        .query_documents(&RagQuery::new("position").with_limit(0))
        .await
        .unwrap();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn echo_sees_override_and_raw_body() {
    let client = start_server().await;
    let options = RequestOptions::new()
        .method(HttpMethod::Put)
        .header("content-type", "text/plain")
        .body("not json at all");

    let echo: serde_json::Value = client.request("/echo", options).await.unwrap();
    assert_eq!(echo["method"], "PUT");
    assert_eq!(echo["headers"]["content-type"], "text/plain");
    assert_eq!(echo["body"], "not json at all");
}

#[tokio::test]
async fn failure_routes() {
    let client = start_server().await;

    let err = client.get::<serde_json::Value>("/status/418").await.unwrap_err();
    assert_eq!(err.status(), Some(418));

    let err = client.get::<User>("/malformed").await.unwrap_err();
    assert!(err.is_decode());
}

#[tokio::test]
async fn execute_returns_raw_response_for_core_built_requests() {
    let client = start_server().await;

    let response = client
        .execute(client.core().build_get("/users/99"))
        .await
        .unwrap();
    assert_eq!(response.status, 404);
    assert!(!response.is_success());

    let response = client
        .execute(client.core().build_delete("/users/1"))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    let removed: User = serde_json::from_str(&response.body).unwrap();
    assert_eq!(removed.id, 1);
}
