//! Network address helpers.

pub mod addr;

pub use addr::parse_server_addr;
