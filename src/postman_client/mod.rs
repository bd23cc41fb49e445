//! Authenticated HTTP client for the Postman REST API
//!
//! Every tool handler funnels through [`PostmanClient::request`], which resolves the
//! API key, composes headers, enforces the request timeout and classifies failures.
//! Request composition is a pure step ([`PostmanClient::compose`]) so the outbound
//! shape can be inspected without touching the network.

pub mod error;
pub mod headers;

use std::{
    env,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use mime::Mime;
use reqwest::{header::CONTENT_TYPE, Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

pub use error::{ApiError, ErrorKind};
pub use headers::{HeaderSet, API_KEY_HEADER, CLIENT_USER_AGENT};

pub const DEFAULT_BASE_URL: &str = "https://api.postman.com";
pub const API_KEY_ENV: &str = "POSTMAN_API_KEY";
pub const BASE_URL_ENV: &str = "POSTMAN_API_BASE_URL";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Patch => Method::PATCH,
            Self::Delete => Method::DELETE,
        }
    }
}

/// Content type announced for a request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentType {
    #[default]
    Json,
    JsonPatch,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::JsonPatch => "application/json-patch+json",
        }
    }
}

/// Per-call request description. The endpoint path is passed separately and must
/// already contain interpolated identifiers and the query string.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<String>,
    pub content_type: Option<ContentType>,
    pub headers: Vec<(String, String)>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Fully resolved outbound request.
#[derive(Debug, Clone)]
pub struct ComposedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderSet,
    pub body: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    Text(String),
    /// 204 No Content.
    Empty,
}

impl ApiResponse {
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
            Self::Empty => Value::Null,
        }
    }
}

#[async_trait]
pub trait PostmanApi: Send + Sync {
    async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct PostmanClient {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    http: Client,
}

impl PostmanClient {
    /// Builds an independently configured client. Performs no I/O.
    ///
    /// Without an explicit base URL, `POSTMAN_API_BASE_URL` is consulted before
    /// falling back to [`DEFAULT_BASE_URL`].
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        let base_url = non_empty(base_url.as_deref())
            .or_else(|| non_empty(env::var(BASE_URL_ENV).ok().as_deref()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: non_empty(api_key.as_deref()),
            timeout: REQUEST_TIMEOUT,
            http: Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Per-call override, then the configured key, then `POSTMAN_API_KEY` at call time.
    pub fn resolve_api_key(&self, override_key: Option<&str>) -> Option<String> {
        non_empty(override_key)
            .or_else(|| self.api_key.clone())
            .or_else(|| non_empty(env::var(API_KEY_ENV).ok().as_deref()))
    }

    pub fn compose(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ComposedRequest, ApiError> {
        let api_key = self
            .resolve_api_key(options.api_key.as_deref())
            .ok_or(ApiError::MissingApiKey)?;

        let content_type = options.content_type.unwrap_or_default();
        let body_content_type = options.body.as_ref().map(|_| content_type.as_str());
        let headers = headers::compose_headers(body_content_type, &options.headers, &api_key);

        let base_url = options
            .base_url
            .as_deref()
            .map(|base_url| base_url.trim_end_matches('/'))
            .unwrap_or(&self.base_url);

        Ok(ComposedRequest {
            method: options.method,
            url: format!("{base_url}{endpoint}"),
            headers,
            body: options.body,
            timeout: self.timeout,
        })
    }

    pub async fn dispatch(&self, request: ComposedRequest) -> Result<ApiResponse, ApiError> {
        let header_map = request.headers.to_header_map()?;
        let method = request.method.as_str();
        let path = request.url.split('?').next().unwrap_or_default().to_string();

        debug!(method, url = %path, "dispatching postman api request");

        let mut builder = self
            .http
            .request(request.method.to_reqwest(), &request.url)
            .headers(header_map)
            .timeout(request.timeout);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await?;
            let error = ApiError::from_status(status.as_u16(), body);
            warn!(
                method,
                url = %path,
                status = status.as_u16(),
                kind = ?error.kind(),
                "postman api request failed"
            );
            return Err(error);
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(ApiResponse::Empty);
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_content_type);

        if is_json {
            Ok(ApiResponse::Json(response.json::<Value>().await?))
        } else {
            Ok(ApiResponse::Text(response.text().await?))
        }
    }

    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let composed = self.compose(endpoint, options)?;
        self.dispatch(composed).await
    }

    pub async fn get(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.request(endpoint, RequestOptions { method: HttpMethod::Get, ..options })
            .await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.request(endpoint, RequestOptions { method: HttpMethod::Post, ..options })
            .await
    }

    pub async fn put(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.request(endpoint, RequestOptions { method: HttpMethod::Put, ..options })
            .await
    }

    pub async fn patch(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.request(endpoint, RequestOptions { method: HttpMethod::Patch, ..options })
            .await
    }

    pub async fn delete(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.request(endpoint, RequestOptions { method: HttpMethod::Delete, ..options })
            .await
    }
}

#[async_trait]
impl PostmanApi for PostmanClient {
    async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        PostmanClient::request(self, endpoint, options).await
    }
}

/// One client per process, held explicitly by whoever composes the application.
///
/// The first `get_instance` call fixes the configuration; later arguments are ignored
/// until `reset_instance` empties the slot.
#[derive(Debug, Default)]
pub struct SharedClient {
    slot: Mutex<Option<Arc<PostmanClient>>>,
}

impl SharedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_instance(
        &self,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Arc<PostmanClient> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slot.get_or_insert_with(|| Arc::new(PostmanClient::new(api_key, base_url))))
    }

    pub fn reset_instance(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }
}

pub fn is_json_content_type(value: &str) -> bool {
    value
        .parse::<Mime>()
        .map(|parsed| parsed.subtype() == mime::JSON || parsed.suffix() == Some(mime::JSON))
        .unwrap_or(false)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
