//! HTTP transport for the gateway.
//!
//! [`ApiRequest`] describes one call relative to the backend base URL and
//! [`Transport`] performs it. [`HttpTransport`] talks to a real backend over
//! reqwest; [`MockTransport`] answers from a queue for tests and offline use.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// One backend call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    route: &'static str,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<JsonValue>,
}

impl ApiRequest {
    /// Create a request.
    ///
    /// `route` is the path template used for log fields and metric labels
    /// (e.g. `/users/{userId}`); `segments` are the concrete path segments,
    /// percent-encoded by the transport.
    pub fn new<I, S>(method: Method, route: &'static str, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            route,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get<I, S>(route: &'static str, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, route, segments)
    }

    pub fn put<I, S>(route: &'static str, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::PUT, route, segments)
    }

    pub fn post<I, S>(route: &'static str, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, route, segments)
    }

    pub fn delete<I, S>(route: &'static str, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::DELETE, route, segments)
    }

    /// Append a query parameter. Values are sent as given, without clamping.
    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Set a per-request header. Overrides a default header of the same name.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Attach a JSON body.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, GatewayError> {
        let value = serde_json::to_value(body).map_err(|e| {
            GatewayError::InvalidRequest(format!("Failed to serialize request body: {}", e))
        })?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn route(&self) -> &'static str {
        self.route
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive lookup of a per-request header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&JsonValue> {
        self.body.as_ref()
    }

    /// Unencoded path, e.g. `/users/STU001`.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Unencoded path and query, e.g. `/users?page=2&limit=25`.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.path(), query.join("&"))
    }
}

/// A response as received, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Build a response, deriving the status text from the status code.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
            .to_string();
        Self {
            status,
            status_text,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &JsonValue) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`GatewayError::Http`].
    pub fn error_for_status(self) -> Result<Self, GatewayError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(GatewayError::Http {
                status: self.status,
                status_text: self.status_text,
            })
        }
    }
}

/// Performs one request/response exchange.
///
/// Implementations do not retry, time out or interpret status codes; the
/// gateway layers those on top.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, GatewayError>;
}

/// Transport backed by a reqwest [`Client`].
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    default_headers: HeaderMap,
}

impl HttpTransport {
    /// Create a transport for the configured backend.
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidRequest`] if the base URL or a default
    /// header cannot be parsed.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            GatewayError::InvalidRequest(format!("Invalid base URL {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidRequest(format!(
                "Base URL cannot carry a path: {}",
                config.base_url
            )));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &config.default_headers {
            let (name, value) = parse_header(name, value)?;
            default_headers.insert(name, value);
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                GatewayError::InvalidRequest(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            default_headers,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a request: base path, encoded segments, then query.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                GatewayError::InvalidRequest(format!("Base URL cannot carry a path: {}", self.base_url))
            })?;
            path.pop_if_empty();
            path.extend(request.segments());
        }
        if !request.query().is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .query()
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, GatewayError> {
        let url = self.url_for(request)?;

        let mut headers = self.default_headers.clone();
        for (name, value) in request.headers() {
            let (name, value) = parse_header(name, value)?;
            headers.insert(name, value);
        }

        let mut builder = self
            .client
            .request(request.method().clone(), url)
            .headers(headers);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), GatewayError> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid header name {}: {}", name, e)))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid value for header {}: {}", name, e)))?;
    Ok((header_name, header_value))
}

/// Transport answering from a queue of canned responses.
///
/// Every request is recorded so tests can assert on what would have been sent.
/// When the queue is empty the `fallback` response (if any) is returned.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse, GatewayError>>>,
    fallback: Mutex<Option<Result<RawResponse, GatewayError>>>,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    /// Create a mock transport with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every answer, to simulate a slow backend.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: u16, body: JsonValue) {
        self.push_response(RawResponse::json(status, &body));
    }

    pub fn push_response(&self, response: RawResponse) {
        lock(&self.responses).push_back(Ok(response));
    }

    pub fn push_error(&self, error: GatewayError) {
        lock(&self.responses).push_back(Err(error));
    }

    /// Answer with this response whenever the queue is empty.
    pub fn respond_always(&self, response: RawResponse) {
        *lock(&self.fallback) = Some(Ok(response));
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, GatewayError> {
        lock(&self.requests).push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = lock(&self.responses).pop_front();
        match queued {
            Some(answer) => answer,
            None => lock(&self.fallback).clone().unwrap_or_else(|| {
                Err(GatewayError::InvalidRequest(
                    "Mock transport has no queued response".to_string(),
                ))
            }),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
