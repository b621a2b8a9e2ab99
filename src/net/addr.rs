//! Server address parsing.
//!
//! # Responsibilities
//! - Split `host:port` strings before a raw TCP or cache connection is made
//!
//! # Design Decisions
//! - Never fails; malformed input gets a best-effort split
//! - Split happens at the last colon
//! - Bracketed IPv6 (`[::1]:6379`, `[::1]`) has its brackets stripped and the
//!   port taken only from a colon right after `]`; unbracketed IPv6 literals
//!   are split at the last colon like anything else

/// Split a `host:port` address into its host and port parts.
///
/// An address without a colon is returned whole as the host with an empty port.
///
/// ```
/// use service_common::net::parse_server_addr;
///
/// assert_eq!(parse_server_addr("10.94.64.101:6379"), ("10.94.64.101", "6379"));
/// assert_eq!(parse_server_addr("localhost"), ("localhost", ""));
/// ```
pub fn parse_server_addr(addr: &str) -> (&str, &str) {
    if let Some(rest) = addr.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            let host = &rest[..end];
            let port = rest[end + 1..].strip_prefix(':').unwrap_or("");
            return (host, port);
        }
    }

    match addr.rfind(':') {
        Some(idx) => (&addr[..idx], &addr[idx + 1..]),
        None => (addr, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_and_port() {
        let (host, port) = parse_server_addr("10.94.64.101:6379");
        assert_eq!(host, "10.94.64.101");
        assert_eq!(port, "6379");
    }

    #[test]
    fn test_parse_hostname() {
        assert_eq!(parse_server_addr("redis.internal:6380"), ("redis.internal", "6380"));
    }

    #[test]
    fn test_no_colon_is_all_host() {
        assert_eq!(parse_server_addr("10.94.64.101"), ("10.94.64.101", ""));
        assert_eq!(parse_server_addr(""), ("", ""));
    }

    #[test]
    fn test_empty_parts() {
        assert_eq!(parse_server_addr(":6379"), ("", "6379"));
        assert_eq!(parse_server_addr("127.0.0.1:"), ("127.0.0.1", ""));
    }

    #[test]
    fn test_splits_on_last_colon() {
        assert_eq!(parse_server_addr("a:b:c"), ("a:b", "c"));
    }

    #[test]
    fn test_bracketed_ipv6() {
        assert_eq!(parse_server_addr("[::1]:6379"), ("::1", "6379"));
        assert_eq!(parse_server_addr("[fe80::1%eth0]:80"), ("fe80::1%eth0", "80"));
        assert_eq!(parse_server_addr("[::1]"), ("::1", ""));
        assert_eq!(parse_server_addr("[::1]junk"), ("::1", ""));
    }

    #[test]
    fn test_unclosed_bracket_falls_back_to_last_colon() {
        assert_eq!(parse_server_addr("[::1:6379"), ("[::1", "6379"));
    }

    #[test]
    fn test_unbracketed_ipv6_is_best_effort() {
        assert_eq!(parse_server_addr("::1"), (":", "1"));
    }
}
