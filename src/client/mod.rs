//! Client-side functionality for the Rashomon proxy
//!
//! `proxy` resolves the proxy address and points the process environment at it;
//! `transport` talks to the proxy endpoint directly for check requests.

pub mod proxy;
pub mod transport;

pub use proxy::{configure_proxy, default_proxy_url, ProxyConfiguration};
pub use transport::{check, target_host, RashomonClient};
