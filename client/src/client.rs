//! Async host for `api-core`: executes built requests with reqwest.
//!
//! # Design
//! Every public call goes through `dispatch`, which executes one request,
//! hands the response to `ApiCore::parse_response`, and logs any failure
//! before returning it unchanged. There is no retry, timeout or cache; a
//! request that never completes keeps its caller waiting.

use api_core::{ApiCore, HttpMethod, HttpRequest, HttpResponse, RequestOptions};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::config::RuntimeConfig;
use crate::error::ClientError;

/// JSON API client bound to one base URL.
///
/// Cheap to clone; clones share the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    core: ApiCore,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Use a caller-configured `reqwest::Client`, e.g. one with a timeout.
    pub fn with_http_client(
        base_url: impl Into<String>,
        http: reqwest::Client,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            core: ApiCore::new(base_url)?,
            http,
        })
    }

    /// Client targeting `config.public.api_base`.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, ClientError> {
        Self::new(config.public.api_base.clone())
    }

    pub fn base_url(&self) -> &str {
        self.core.base_url()
    }

    /// The sans-IO builder behind this client. Requests built with it can be
    /// sent through [`ApiClient::execute`] to read the raw response.
    pub fn core(&self) -> &ApiCore {
        &self.core
    }

    /// Send one request to `base_url + endpoint` and decode the JSON reply.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let request = self.core.build_request(endpoint, options);
        self.dispatch(request).await
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.dispatch(self.core.build_get(endpoint)).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, data: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .core
            .build_post(endpoint, data)
            .map_err(|err| self.log_failure(HttpMethod::Post, endpoint, err.into()))?;
        self.dispatch(request).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, data: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .core
            .build_put(endpoint, data)
            .map_err(|err| self.log_failure(HttpMethod::Put, endpoint, err.into()))?;
        self.dispatch(request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.dispatch(self.core.build_delete(endpoint)).await
    }

    /// Execute `request` without interpreting the status. Non-2xx responses
    /// come back as data; only transport problems are errors.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        debug!(method = %request.method, url = %request.url, "sending API request");

        let mut builder = self
            .http
            .request(to_reqwest_method(request.method), &request.url)
            .headers(header_map(&request.headers)?);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, ClientError> {
        let method = request.method;
        let url = request.url.clone();
        let result = match self.execute(request).await {
            Ok(response) => self.core.parse_response(response).map_err(ClientError::from),
            Err(err) => Err(err),
        };
        result.map_err(|err| {
            error!(%method, %url, error = %err, "API call failed");
            err
        })
    }

    fn log_failure(&self, method: HttpMethod, endpoint: &str, err: ClientError) -> ClientError {
        error!(%method, url = %self.core.url(endpoint), error = %err, "API call failed");
        err
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

/// Validate header pairs into a reqwest `HeaderMap`, keeping duplicates.
fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ClientError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ClientError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        map.append(header_name, header_value);
    }
    Ok(map)
}
