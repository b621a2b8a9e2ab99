//! HTTP client errors.

use std::error::Error as StdError;

use thiserror::Error;

/// Transport-level failures of a client call.
///
/// A response with any status code, 4xx and 5xx included, is not an error.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The deadline expired before the body was fully read.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The request failed before any response arrived.
    #[error("connection error: {0}")]
    Connection(#[source] reqwest::Error),

    /// A response arrived but could not be read.
    #[error("protocol error: {0}")]
    Protocol(#[source] reqwest::Error),

    /// The URL, a header or the payload could not be turned into a request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl HttpError {
    /// Classify a failure of sending the request and reading the head.
    pub(crate) fn from_send(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_ms }
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else if err.is_redirect() || err.is_decode() || is_malformed_response(&err) {
            Self::Protocol(err)
        } else {
            Self::Connection(err)
        }
    }

    /// Classify a failure of reading the response body.
    pub(crate) fn from_body(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_ms }
        } else {
            Self::Protocol(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

/// Whether hyper rejected what the peer sent back as a response.
fn is_malformed_response(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(hyper_err) = cause.downcast_ref::<hyper::Error>() {
            return hyper_err.is_parse()
                || hyper_err.is_parse_status()
                || hyper_err.is_incomplete_message();
        }
        source = cause.source();
    }
    false
}
