//! Traced HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! Caller (Trace, url, params, timeout, headers)
//!     → params.rs (encode query string / form body)
//!     → client.rs (build request, attach trace headers)
//!     → reqwest transport, bounded by the timeout
//!     → HttpResponse { status, body } or error.rs (HttpError)
//! ```

pub mod client;
pub mod error;
pub mod params;

pub use client::{http_get, http_json, http_post, Headers, HttpClient, HttpResponse};
pub use error::HttpError;
pub use params::Values;
