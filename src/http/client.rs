//! Traced HTTP client.
//!
//! # Responsibilities
//! - Issue GET, form POST and JSON POST requests
//! - Enforce a per-call deadline covering connect, send and body read
//! - Attach the caller's trace to headers and log lines
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities around the whole exchange
//! - Timeout errors are distinct from other errors
//! - Any received status is a success; only transport failures are errors
//! - No retries; redirect and pooling behavior are reqwest's defaults

use std::borrow::Cow;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use url::Url;

use crate::http::error::HttpError;
use crate::http::params::Values;
use crate::observability::trace::{Trace, SPAN_ID_HEADER, TRACE_ID_HEADER};

/// Extra request headers, name to value.
pub type Headers = HashMap<String, String>;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Status and fully-read body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body as text, invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client wrapper.
///
/// Holds no per-call state; clones share the underlying connection pool.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-configured reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// GET `url` with `query` appended to its query string.
    pub async fn get(
        &self,
        trace: &Trace,
        url: &str,
        query: &Values,
        timeout_ms: u64,
        headers: Option<&Headers>,
    ) -> Result<HttpResponse, HttpError> {
        let url = with_query(url, query)?;
        let headers = build_headers(trace, headers, None)?;
        let request = self.client.request(Method::GET, url.clone()).headers(headers);

        self.execute(trace, Method::GET, &url, request, timeout_ms).await
    }

    /// POST `form` url-encoded as the body.
    ///
    /// A non-empty `raw_body` is sent as the body instead, and `form` is then
    /// appended to the URL query string. A `Content-Type` in `headers`
    /// overrides the form default.
    pub async fn post(
        &self,
        trace: &Trace,
        url: &str,
        form: &Values,
        timeout_ms: u64,
        headers: Option<&Headers>,
        raw_body: &str,
    ) -> Result<HttpResponse, HttpError> {
        let (url, body) = if raw_body.is_empty() {
            (parse_url(url)?, form.encode())
        } else {
            (with_query(url, form)?, raw_body.to_string())
        };
        let headers = build_headers(trace, headers, Some(FORM_CONTENT_TYPE))?;
        let request = self
            .client
            .request(Method::POST, url.clone())
            .headers(headers)
            .body(body);

        self.execute(trace, Method::POST, &url, request, timeout_ms).await
    }

    /// POST `json` verbatim with a JSON content type.
    pub async fn json(
        &self,
        trace: &Trace,
        url: &str,
        json: &str,
        timeout_ms: u64,
        headers: Option<&Headers>,
    ) -> Result<HttpResponse, HttpError> {
        let url = parse_url(url)?;
        let headers = build_headers(trace, headers, Some(JSON_CONTENT_TYPE))?;
        let request = self
            .client
            .request(Method::POST, url.clone())
            .headers(headers)
            .body(json.to_string());

        self.execute(trace, Method::POST, &url, request, timeout_ms).await
    }

    /// Serialize `payload` and POST it like [`HttpClient::json`].
    pub async fn json_value<T: Serialize + ?Sized>(
        &self,
        trace: &Trace,
        url: &str,
        payload: &T,
        timeout_ms: u64,
        headers: Option<&Headers>,
    ) -> Result<HttpResponse, HttpError> {
        let json = serde_json::to_string(payload).map_err(|e| {
            HttpError::InvalidRequest(format!("failed to serialize JSON body: {}", e))
        })?;

        self.json(trace, url, &json, timeout_ms, headers).await
    }

    async fn execute(
        &self,
        trace: &Trace,
        method: Method,
        url: &Url,
        request: RequestBuilder,
        timeout_ms: u64,
    ) -> Result<HttpResponse, HttpError> {
        let start = Instant::now();

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| HttpError::from_send(e, timeout_ms))?;
            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| HttpError::from_body(e, timeout_ms))?;

            Ok::<_, HttpError>(HttpResponse {
                status,
                body: body.to_vec(),
            })
        };

        // Zero disables the deadline.
        let result = if timeout_ms == 0 {
            exchange.await
        } else {
            match tokio::time::timeout(Duration::from_millis(timeout_ms), exchange).await {
                Ok(result) => result,
                Err(_) => Err(HttpError::Timeout { timeout_ms }),
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(response) => tracing::info!(
                trace_id = %trace.trace_id(),
                span_id = %trace.span_id(),
                method = %method,
                url = %url,
                status = response.status,
                elapsed_ms,
                "HTTP request success"
            ),
            Err(e) => tracing::warn!(
                trace_id = %trace.trace_id(),
                span_id = %trace.span_id(),
                method = %method,
                url = %url,
                timeout_ms,
                elapsed_ms,
                error = %e,
                "HTTP request failed"
            ),
        }

        result
    }
}

fn default_client() -> &'static HttpClient {
    static CLIENT: Lazy<HttpClient> = Lazy::new(HttpClient::new);
    &CLIENT
}

/// [`HttpClient::get`] on the process-wide default client.
pub async fn http_get(
    trace: &Trace,
    url: &str,
    query: &Values,
    timeout_ms: u64,
    headers: Option<&Headers>,
) -> Result<HttpResponse, HttpError> {
    default_client().get(trace, url, query, timeout_ms, headers).await
}

/// [`HttpClient::post`] on the process-wide default client.
pub async fn http_post(
    trace: &Trace,
    url: &str,
    form: &Values,
    timeout_ms: u64,
    headers: Option<&Headers>,
    raw_body: &str,
) -> Result<HttpResponse, HttpError> {
    default_client()
        .post(trace, url, form, timeout_ms, headers, raw_body)
        .await
}

/// [`HttpClient::json`] on the process-wide default client.
pub async fn http_json(
    trace: &Trace,
    url: &str,
    json: &str,
    timeout_ms: u64,
    headers: Option<&Headers>,
) -> Result<HttpResponse, HttpError> {
    default_client().json(trace, url, json, timeout_ms, headers).await
}

fn parse_url(url: &str) -> Result<Url, HttpError> {
    Url::parse(url)
        .map_err(|e| HttpError::InvalidRequest(format!("invalid URL {:?}: {}", url, e)))
}

fn with_query(url: &str, params: &Values) -> Result<Url, HttpError> {
    let mut url = parse_url(url)?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params.iter());
    }
    Ok(url)
}

fn build_headers(
    trace: &Trace,
    extra: Option<&Headers>,
    content_type: Option<&'static str>,
) -> Result<HeaderMap, HttpError> {
    let mut headers = HeaderMap::new();

    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    for (name, value) in extra.into_iter().flatten() {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            HttpError::InvalidRequest(format!("invalid header name {:?}: {}", name, e))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            HttpError::InvalidRequest(format!("invalid value for header {}: {}", name, e))
        })?;
        headers.insert(name, value);
    }

    for (name, value) in [
        (TRACE_ID_HEADER, trace.trace_id()),
        (SPAN_ID_HEADER, trace.span_id()),
    ] {
        let value = HeaderValue::from_str(value).map_err(|e| {
            HttpError::InvalidRequest(format!("invalid trace header {}: {}", name, e))
        })?;
        headers.insert(HeaderName::from_static(name), value);
    }

    Ok(headers)
}
