//! Configuration schema definitions.
//!
//! Typed records decoded from the per-environment TOML files. Field names
//! (or `#[serde(rename)]`) name the keys in the file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::net::parse_server_addr;

/// HTTP server settings, usually loaded from `http.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpConf {
    /// Listen address (e.g., "127.0.0.1:8880").
    pub server_addr: String,

    /// Read timeout in seconds.
    pub read_timeout: u64,

    /// Write timeout in seconds.
    pub write_timeout: u64,

    /// Maximum request header size, in kilobytes.
    pub max_header_bytes: usize,

    /// Hosts allowed to call the server. Empty allows everyone.
    #[serde(default)]
    pub allow_host: Vec<String>,
}

impl HttpConf {
    /// Host and port parts of `server_addr`.
    pub fn host_port(&self) -> (&str, &str) {
        parse_server_addr(&self.server_addr)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout)
    }

    pub fn is_host_allowed(&self, host: &str) -> bool {
        self.allow_host.is_empty() || self.allow_host.iter().any(|h| h == host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf() -> HttpConf {
        HttpConf {
            server_addr: "10.94.64.101:8880".into(),
            read_timeout: 10,
            write_timeout: 5,
            max_header_bytes: 20,
            allow_host: vec!["127.0.0.1".into()],
        }
    }

    #[test]
    fn test_host_port() {
        assert_eq!(conf().host_port(), ("10.94.64.101", "8880"));
    }

    #[test]
    fn test_timeouts() {
        let c = conf();
        assert_eq!(c.read_timeout(), Duration::from_secs(10));
        assert_eq!(c.write_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_allow_host() {
        let mut c = conf();
        assert!(c.is_host_allowed("127.0.0.1"));
        assert!(!c.is_host_allowed("10.0.0.1"));

        c.allow_host.clear();
        assert!(c.is_host_allowed("10.0.0.1"));
    }
}
