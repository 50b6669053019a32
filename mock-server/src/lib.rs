//! In-memory stand-in for the JSON backend.
//!
//! Everything is served under `/api`, matching the default client base URL
//! `http://localhost:8000/api`. Besides the backend's own endpoints it carries
//! a few diagnostic routes (`/echo`, `/status/{code}`, `/malformed`) that let
//! tests observe exactly what a client sent or force a failure mode.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};

/// Default `n_results` for `/rag/query` when the request omits it.
pub const DEFAULT_RETRIEVER_K: usize = 4;

/// Frontend dev-server origins allowed by CORS.
pub const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:3001"];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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

#[derive(Deserialize)]
pub struct MetricsRequest {
    pub results: Vec<ExtractionResult>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
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

#[derive(Deserialize)]
pub struct RagQuery {
    pub text: String,
    pub n_results: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub text: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// What `/echo` saw: method, headers (lowercase names) and raw body.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Debug)]
struct UserStore {
    next_id: u64,
    users: BTreeMap<u64, User>,
}

#[derive(Clone)]
pub struct AppState {
    users: Arc<RwLock<UserStore>>,
    documents: Arc<Vec<Document>>,
}

impl Default for AppState {
    /// One seeded user (`1`, "Ana") and a handful of connector datasheet chunks.
    fn default() -> Self {
        let mut users = BTreeMap::new();
        users.insert(
            1,
            User {
                id: 1,
                name: "Ana".to_string(),
            },
        );
        Self {
            users: Arc::new(RwLock::new(UserStore { next_id: 2, users })),
            documents: Arc::new(seed_documents()),
        }
    }
}

fn seed_documents() -> Vec<Document> {
    let chunks = [
        ("datasheet-a.pdf", 1, "Housing material: PA66 GF30, colour black."),
        (
            "datasheet-a.pdf",
            2,
            "Max. working temperature 125 °C, min. working temperature -40 °C.",
        ),
        ("datasheet-b.pdf", 1, "Sealing class IP67, wire seal and housing seal included."),
        ("datasheet-b.pdf", 2, "Number of cavities: 12, number of rows: 2."),
        (
            "datasheet-c.pdf",
            1,
            "Terminal position assurance and connector position assurance available.",
        ),
    ];
    chunks
        .into_iter()
        .map(|(source, page, text)| {
            let mut metadata = serde_json::Map::new();
            metadata.insert("source".to_string(), source.into());
            metadata.insert("page".to_string(), page.into());
            Document {
                text: text.to_string(),
                metadata,
            }
        })
        .collect()
}

pub fn app() -> Router {
    let api = Router::new()
        .route("/hello", get(hello))
        .route("/extract/metrics", post(calculate_metrics))
        .route("/rag/query", post(query_documents))
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(replace_user).delete(delete_user))
        .route("/echo", any(echo))
        .route("/status/{code}", get(status))
        .route("/malformed", get(malformed))
        .with_state(AppState::default());

    Router::new()
        .nest("/api", api)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(ALLOWED_ORIGINS.map(HeaderValue::from_static))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn hello() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello from the mock API!" }))
}

/// Aggregate extraction results. Rates divide by the batch size, accuracies by
/// the results that were actually found; an empty denominator yields 0.
pub fn compute_metrics(results: &[ExtractionResult]) -> MetricsResponse {
    let total_fields = results.len() as i64;
    let count = |pred: fn(&ExtractionResult) -> bool| {
        results.iter().filter(|r| pred(r)).count() as i64
    };

    let success_count = count(|r| r.is_success);
    let error_count = count(|r| r.is_error);
    let not_found_count = count(|r| r.is_not_found);
    let rate_limit_count = count(|r| r.is_rate_limit);
    let exact_match_count = count(|r| r.exact_match == Some(true));
    let case_insensitive_match_count = count(|r| r.case_insensitive_match == Some(true));

    let ratio = |n: i64, d: i64| if d > 0 { n as f64 / d as f64 } else { 0.0 };
    let accuracy_denominator = total_fields - not_found_count;
    let avg_latency = if total_fields > 0 {
        results.iter().map(|r| r.latency).sum::<f64>() / total_fields as f64
    } else {
        0.0
    };

    MetricsResponse {
        total_fields,
        success_count,
        error_count,
        not_found_count,
        rate_limit_count,
        exact_match_count,
        case_insensitive_match_count,
        accuracy_denominator,
        success_rate: ratio(success_count, total_fields),
        error_rate: ratio(error_count, total_fields),
        not_found_rate: ratio(not_found_count, total_fields),
        rate_limit_rate: ratio(rate_limit_count, total_fields),
        exact_match_accuracy: ratio(exact_match_count, accuracy_denominator),
        case_insensitive_accuracy: ratio(case_insensitive_match_count, accuracy_denominator),
        avg_latency,
    }
}

async fn calculate_metrics(Json(input): Json<MetricsRequest>) -> Json<MetricsResponse> {
    let metrics = compute_metrics(&input.results);
    tracing::debug!(total = metrics.total_fields, "computed extraction metrics");
    Json(metrics)
}

async fn query_documents(
    State(state): State<AppState>,
    Json(query): Json<RagQuery>,
) -> Json<Vec<Document>> {
    let needle = query.text.to_lowercase();
    let limit = query.n_results.unwrap_or(DEFAULT_RETRIEVER_K);
    let hits = state
        .documents
        .iter()
        .filter(|doc| doc.text.to_lowercase().contains(&needle))
        .take(limit)
        .cloned()
        .collect();
    Json(hits)
}

async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    let store = state.users.read().await;
    Json(store.users.values().cloned().collect())
}

async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<NewUser>,
) -> (StatusCode, Json<User>) {
    let mut store = state.users.write().await;
    let user = User {
        id: store.next_id,
        name: input.name,
    };
    store.next_id += 1;
    store.users.insert(user.id, user.clone());
    tracing::debug!(id = user.id, "created user");
    (StatusCode::CREATED, Json(user))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<User>, StatusCode> {
    let store = state.users.read().await;
    store.users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<NewUser>,
) -> Result<Json<User>, StatusCode> {
    let mut store = state.users.write().await;
    let user = store.users.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    user.name = input.name;
    tracing::debug!(id, "replaced user");
    Ok(Json(user.clone()))
}

/// Answers 200 with the removed user.
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<User>, StatusCode> {
    let mut store = state.users.write().await;
    let user = store.users.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    tracing::debug!(id, "deleted user");
    Ok(Json(user))
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn malformed() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        "{\"id\": 1, \"name\": ",
    )
}
