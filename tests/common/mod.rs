//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Latency of the `/slow` endpoint.
#[allow(dead_code)]
pub const SLOW_DELAY: Duration = Duration::from_millis(500);

/// Start an echo server on an ephemeral port.
///
/// - `GET /get` echoes the `city_id` query parameter
/// - `POST /post` echoes `city_id` from the form body, falling back to the query
/// - `POST /json` echoes the raw body
/// - `POST /raw` describes content type, query and body
/// - `GET /headers` echoes the trace headers and `x-app`
/// - `GET /slow` answers after [`SLOW_DELAY`]
/// - `GET /error` answers 500 with an empty body
pub async fn start_echo_server() -> SocketAddr {
    let app = Router::new()
        .route(
            "/get",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                params.get("city_id").cloned().unwrap_or_default()
            }),
        )
        .route("/post", post(echo_form))
        .route("/json", post(|body: Bytes| async move { body }))
        .route("/raw", post(describe_request))
        .route("/headers", get(echo_headers))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(SLOW_DELAY).await;
                "late"
            }),
        )
        .route("/error", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

async fn echo_form(Query(query): Query<HashMap<String, String>>, body: Bytes) -> String {
    url::form_urlencoded::parse(&body)
        .find(|(k, _)| k == "city_id")
        .map(|(_, v)| v.into_owned())
        .or_else(|| query.get("city_id").cloned())
        .unwrap_or_default()
}

async fn describe_request(
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> String {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let mut query: Vec<_> = query.into_iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    query.sort();

    format!(
        "ct={}\nquery={}\nbody={}",
        content_type,
        query.join("&"),
        String::from_utf8_lossy(&body)
    )
}

async fn echo_headers(headers: HeaderMap) -> String {
    ["x-trace-id", "x-span-id", "x-app"]
        .iter()
        .map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Start a backend that sends a fixed raw HTTP response to every connection.
#[allow(dead_code)]
pub async fn start_raw_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Client that ignores proxy settings from the environment.
#[allow(dead_code)]
pub fn client() -> service_common::HttpClient {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    service_common::HttpClient::with_client(client)
}
