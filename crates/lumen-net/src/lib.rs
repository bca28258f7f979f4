//! Networking: std::net DNS and TCP backend, and the TLS provider
//! abstraction.

mod std_backend;
pub mod tls;
#[cfg(feature = "tls-rustls")]
pub mod tls_rustls;

pub use std_backend::{StdNetworkBackend, StdNetworkStream};
pub use tls::TlsProvider;
#[cfg(feature = "tls-rustls")]
pub use tls_rustls::RustlsTlsProvider;

#[cfg(test)]
mod tests;
