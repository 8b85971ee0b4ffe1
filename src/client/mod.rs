//! Naver Open API client.
//!
//! Wraps [`HttpDispatcher`] and adds the client id/secret headers to every
//! outbound call.

use crate::config::ClientConfig;
use crate::dispatcher::{ApiResponse, Headers, HttpDispatcher, QueryParams};
use crate::error::Result;
use crate::model::{SearchKind, SearchRequest, SearchTrendRequest, SEARCH_TREND_PATH};
use serde::Serialize;


pub const HEADER_CLIENT_ID: &str = "X-Naver-Client-Id";
pub const HEADER_CLIENT_SECRET: &str = "X-Naver-Client-Secret";

/// Header-injecting decorator over [`HttpDispatcher`].
#[derive(Debug, Clone)]
pub struct NaverClient {
    dispatcher: HttpDispatcher,
}

impl NaverClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let dispatcher = HttpDispatcher::new(config)?;
        tracing::info!("NaverClient initialized");
        Ok(Self { dispatcher })
    }

    pub fn from_dispatcher(dispatcher: HttpDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn config(&self) -> &ClientConfig {
        self.dispatcher.config()
    }

    pub fn dispatcher(&self) -> &HttpDispatcher {
        &self.dispatcher
    }

    /// The identity header pair taken from the config.
    pub fn auth_headers(&self) -> Headers {
        let config = self.config();
        let mut headers = Headers::new();
        headers.insert(HEADER_CLIENT_ID.to_string(), config.client_id().to_string());
        headers.insert(
            HEADER_CLIENT_SECRET.to_string(),
            config.client_secret().to_string(),
        );
        headers
    }

    /// Auth headers first, `custom` overlaid on top.
    ///
    /// A custom entry named exactly like an auth header replaces it.
    pub fn merge_headers(&self, custom: &Headers) -> Headers {
        let mut headers = self.auth_headers();
        headers.extend(custom.iter().map(|(k, v)| (k.clone(), v.clone())));
        headers
    }

    pub fn get(&self, path: &str) -> Result<ApiResponse> {
        self.dispatcher.get_with_headers(path, &self.auth_headers())
    }

    pub fn get_with_query(&self, path: &str, query: &QueryParams) -> Result<ApiResponse> {
        self.dispatcher
            .get_with_headers_and_query(path, &self.auth_headers(), query)
    }

    pub fn get_with_headers(&self, path: &str, custom: &Headers) -> Result<ApiResponse> {
        self.dispatcher
            .get_with_headers(path, &self.merge_headers(custom))
    }

    pub fn get_with_headers_and_query(
        &self,
        path: &str,
        custom: &Headers,
        query: &QueryParams,
    ) -> Result<ApiResponse> {
        self.dispatcher
            .get_with_headers_and_query(path, &self.merge_headers(custom), query)
    }

    pub fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.dispatcher
            .post_with_headers(path, &self.auth_headers(), body)
    }

    pub fn post_with_headers<B: Serialize + ?Sized>(
        &self,
        path: &str,
        custom: &Headers,
        body: &B,
    ) -> Result<ApiResponse> {
        self.dispatcher
            .post_with_headers(path, &self.merge_headers(custom), body)
    }

    pub fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.dispatcher
            .put_with_headers(path, &self.auth_headers(), body)
    }

    pub fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.dispatcher
            .delete_with_headers(path, &self.auth_headers())
    }

    /// `GET /v1/search/<kind>.json` with the request's parameters.
    pub fn search(&self, kind: SearchKind, request: &SearchRequest) -> Result<ApiResponse> {
        self.get_with_query(&kind.path(), &request.to_query())
    }

    /// `POST /v1/datalab/search`.
    pub fn search_trend(&self, request: &SearchTrendRequest) -> Result<ApiResponse> {
        self.post(SEARCH_TREND_PATH, request)
    }
}
