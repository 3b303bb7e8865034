//! HTTP client for marketplace API checks
//!
//! Sends one request at a time against a fixed base URL. Transport failures
//! never propagate: they come back as [`ApiOutcome::TransportError`].

use anyhow::{Context, Result};
use reqwest::{
    header::{HeaderName, HeaderValue, AUTHORIZATION},
    Client,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// HTTP methods used by the checks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ApiMethod {
    fn to_reqwest(self) -> reqwest::Method {
        match self {
            ApiMethod::Get => reqwest::Method::GET,
            ApiMethod::Post => reqwest::Method::POST,
            ApiMethod::Put => reqwest::Method::PUT,
            ApiMethod::Delete => reqwest::Method::DELETE,
        }
    }

    /// GET and DELETE never carry a JSON body
    fn sends_body(self) -> bool {
        matches!(self, ApiMethod::Post | ApiMethod::Put)
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiMethod::Get => write!(f, "GET"),
            ApiMethod::Post => write!(f, "POST"),
            ApiMethod::Put => write!(f, "PUT"),
            ApiMethod::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single API request
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: ApiMethod,
    pub endpoint: String,
    pub body: Option<Value>,
    pub headers: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: ApiMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            headers: BTreeMap::new(),
            query: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(ApiMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(ApiMethod::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(ApiMethod::Put, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(ApiMethod::Delete, endpoint)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Attach `Authorization: Bearer <token>` when a token is known
    pub fn bearer(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.header(AUTHORIZATION.as_str(), format!("Bearer {token}")),
            None => self,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }
}

/// HTTP response with the body kept as text and parsed lazily
#[derive(Clone, Debug, Serialize)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
    pub duration_ms: u64,
}

impl HttpResponse {
    /// Parsed JSON body, `None` when the body is not JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// JSON body, or the raw text wrapped as a string when it does not parse
    pub fn json_or_raw(&self) -> Value {
        self.json()
            .unwrap_or_else(|| Value::String(self.body.clone()))
    }
}

/// Either a response from the server or a transport failure
#[derive(Clone, Debug)]
pub enum ApiOutcome {
    TransportError(HttpError),
    Response(HttpResponse),
}

impl ApiOutcome {
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiOutcome::Response(resp) => Some(resp),
            ApiOutcome::TransportError(_) => None,
        }
    }

    pub fn transport_error(&self) -> Option<&HttpError> {
        match self {
            ApiOutcome::TransportError(e) => Some(e),
            ApiOutcome::Response(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status_code)
    }

    /// Response only when its status matches `expected`
    pub fn with_status(&self, expected: u16) -> Option<&HttpResponse> {
        self.response().filter(|r| r.status_code == expected)
    }

    /// Status code as text, or `No response` for transport failures
    pub fn status_label(&self) -> String {
        match self.status() {
            Some(code) => code.to_string(),
            None => "No response".to_string(),
        }
    }
}

/// HTTP client bound to the API base URL
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl ApiClient {
    /// Create client with custom timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build full URL as `{base}/{endpoint}`
    pub fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Send a request; transport failures are returned, not raised
    pub async fn send(&self, request: ApiRequest) -> ApiOutcome {
        let url = self.build_url(&request.endpoint);
        debug!("Sending {} request to {}", request.method, url);

        match self.try_send(&url, request).await {
            Ok(resp) => {
                debug!(
                    "Response: {} from {} in {}ms",
                    resp.status_code, url, resp.duration_ms
                );
                ApiOutcome::Response(resp)
            }
            Err(e) => {
                warn!("Request failed: {}", e);
                println!("Request failed: {e}");
                ApiOutcome::TransportError(e)
            }
        }
    }

    async fn try_send(&self, url: &str, request: ApiRequest) -> Result<HttpResponse, HttpError> {
        let mut req_builder = self.client.request(request.method.to_reqwest(), url);

        for (key, value) in &request.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| HttpError::InvalidHeader(key.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| HttpError::InvalidHeader(key.clone()))?;
            req_builder = req_builder.header(name, value);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if request.method.sends_body() {
            if let Some(body) = &request.body {
                req_builder = req_builder.json(body);
            }
        }

        let start = Instant::now();

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                HttpError::ConnectionRefused(url.to_string())
            } else {
                HttpError::RequestFailed(e.to_string())
            }
        })?;

        let status_code = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout_secs)
            } else {
                HttpError::Body(e.to_string())
            }
        })?;

        Ok(HttpResponse {
            status_code,
            body,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
