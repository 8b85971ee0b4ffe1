//! Blocking HTTP dispatch over one reusable request template.
//!
//! The template (base URL, JSON content type, connect/read timeouts) is fixed
//! when the dispatcher is built. Per-call headers and query parameters are
//! layered on a fresh request each time and never written back.
//!
//! HTTP 4xx/5xx statuses come back as ordinary [`ApiResponse`] values. Only
//! network-level failures are errors.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// Default content type for every request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Per-call header set. Keys are sent exactly as given.
pub type Headers = BTreeMap<String, String>;

/// Per-call query parameters.
pub type QueryParams = BTreeMap<String, QueryValue>;

/// A query parameter value: a scalar, or a list sent as repeated keys.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<QueryValue>),
}

impl QueryValue {
    fn append_pairs(&self, key: &str, out: &mut Vec<(String, String)>) {
        match self {
            Self::List(items) => items.iter().for_each(|item| item.append_pairs(key, out)),
            scalar => out.push((key.to_string(), scalar.to_string())),
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
            Self::List(items) => {
                let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&joined.join(","))
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i32> for QueryValue {
    fn from(v: i32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<u32> for QueryValue {
    fn from(v: u32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for QueryValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

/// Build a [`QueryParams`] map from key/value pairs.
pub fn query_params<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Build a [`Headers`] map from key/value pairs.
pub fn headers<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Headers
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

fn flatten_query(params: &QueryParams) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        value.append_pairs(key, &mut pairs);
    }
    pairs
}

fn to_header_map(headers: &Headers) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Mask values of headers that carry credentials.
fn redact_headers(headers: &Headers) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let lower = name.to_ascii_lowercase();
            let shown = if lower.contains("secret")
                || lower.contains("authorization")
                || lower.contains("token")
            {
                "***".to_string()
            } else {
                value.clone()
            };
            (name.clone(), shown)
        })
        .collect()
}

/// Join the base URL and a request path with exactly one slash between them.
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// A fully received HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    fn read(response: reqwest::blocking::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of header `name` if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Owns the shared request template and issues single, unretried calls.
#[derive(Clone)]
pub struct HttpDispatcher {
    config: ClientConfig,
    client: Client,
}

impl HttpDispatcher {
    /// Build the template from `config`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut defaults = HeaderMap::new();
        defaults.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        defaults.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.read_timeout())
            .default_headers(defaults)
            .build()?;

        tracing::info!(
            environment = config.environment().name(),
            base_url = config.base_url(),
            logging = config.logging_enabled(),
            "HTTP dispatcher initialized"
        );

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        join_url(self.config.base_url(), path)
    }

    pub fn get(&self, path: &str) -> Result<ApiResponse> {
        self.dispatch(Method::GET, path, None, None, None)
    }

    pub fn get_with_query(&self, path: &str, query: &QueryParams) -> Result<ApiResponse> {
        self.dispatch(Method::GET, path, None, Some(query), None)
    }

    pub fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        let body = serde_json::to_vec(body)?;
        self.dispatch(Method::POST, path, None, None, Some(body))
    }

    pub fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        let body = serde_json::to_vec(body)?;
        self.dispatch(Method::PUT, path, None, None, Some(body))
    }

    pub fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.dispatch(Method::DELETE, path, None, None, None)
    }

    pub fn get_with_headers(&self, path: &str, headers: &Headers) -> Result<ApiResponse> {
        self.dispatch(Method::GET, path, Some(headers), None, None)
    }

    pub fn get_with_headers_and_query(
        &self,
        path: &str,
        headers: &Headers,
        query: &QueryParams,
    ) -> Result<ApiResponse> {
        self.dispatch(Method::GET, path, Some(headers), Some(query), None)
    }

    pub fn post_with_headers<B: Serialize + ?Sized>(
        &self,
        path: &str,
        headers: &Headers,
        body: &B,
    ) -> Result<ApiResponse> {
        let body = serde_json::to_vec(body)?;
        self.dispatch(Method::POST, path, Some(headers), None, Some(body))
    }

    pub fn put_with_headers<B: Serialize + ?Sized>(
        &self,
        path: &str,
        headers: &Headers,
        body: &B,
    ) -> Result<ApiResponse> {
        let body = serde_json::to_vec(body)?;
        self.dispatch(Method::PUT, path, Some(headers), None, Some(body))
    }

    pub fn delete_with_headers(&self, path: &str, headers: &Headers) -> Result<ApiResponse> {
        self.dispatch(Method::DELETE, path, Some(headers), None, None)
    }

    fn dispatch(
        &self,
        method: Method,
        path: &str,
        headers: Option<&Headers>,
        query: Option<&QueryParams>,
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse> {
        let logging = self.config.logging_enabled();
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("dispatch", %request_id, %method, path);
        let _entered = span.enter();

        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(headers) = headers {
            request = request.headers(to_header_map(headers)?);
        }
        if let Some(query) = query {
            request = request.query(&flatten_query(query));
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        if logging {
            tracing::info!("{} {}", method, path);
            tracing::debug!(
                query = ?query.map(flatten_query),
                headers = ?headers.map(redact_headers),
                "request detail"
            );
        }

        let started = Instant::now();
        let response = request.send().map_err(|e| {
            let err = ClientError::Transport(e);
            if logging {
                tracing::warn!(kind = err.kind(), error = %err, "request failed");
            }
            err
        })?;
        let response = ApiResponse::read(response)?;

        if logging {
            tracing::info!(
                status = response.status(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "{} {} -> {}",
                method,
                path,
                response.status()
            );
            tracing::debug!(body = %response.text(), "response body");
        }

        Ok(response)
    }
}

impl fmt::Debug for HttpDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpDispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
