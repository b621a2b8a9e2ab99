//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! init("./conf/dev/")  (once per process)
//!     → env.rs (resolve root + environment, one-time barrier)
//!
//! parse_local_config("http.toml")
//!     → env.rs (<root>/<env>/http.toml)
//!     → loader.rs (read & deserialize)
//!     → typed config (e.g., schema::HttpConf), owned by the caller
//! ```
//!
//! # Design Decisions
//! - The environment is resolved once and never changes afterwards
//! - Files are decoded fully or not at all
//! - Unknown keys are ignored, missing required keys are errors

pub mod env;
pub mod loader;
pub mod schema;

pub use env::{
    conf_env, conf_file_path, init, init_from_env, parse_local_config, ConfEnv, ConfEnvCell,
};
pub use loader::{parse_config, ConfigError};
pub use schema::HttpConf;
