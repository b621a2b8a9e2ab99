//! Environment-aware configuration and traced HTTP client helpers.
//!
//! # Architecture Overview
//!
//! ```text
//!   process start
//!       │
//!       ▼
//!   ┌──────────────┐   <root>/<env>/<file>.toml   ┌──────────────┐
//!   │    config    │ ───────────────────────────▶ │ typed config │
//!   │ (init once)  │                              └──────┬───────┘
//!   └──────────────┘                                     │ server_addr, ...
//!                                                        ▼
//!   ┌──────────────┐   &Trace    ┌──────────────┐   ┌──────────┐
//!   │observability │ ──────────▶ │     http     │   │   net    │
//!   │    trace     │             │ GET/POST/JSON│   │ host:port│
//!   └──────────────┘             └──────────────┘   └──────────┘
//! ```

pub mod config;
pub mod http;
pub mod net;
pub mod observability;

pub use config::{conf_env, init, parse_local_config, ConfigError, HttpConf};
pub use http::{http_get, http_json, http_post, HttpClient, HttpError, HttpResponse, Values};
pub use net::parse_server_addr;
pub use observability::Trace;
