//! TLS provider abstraction.
//!
//! The fetch client upgrades a plain TCP [`NetworkStream`] through this
//! trait, so it never depends on a concrete TLS library.

use lumen_types::backend::NetworkStream;
use lumen_types::error::Result;

/// Provides TLS client connections.
pub trait TlsProvider: Send + Sync {
    /// Wrap `stream` in a TLS client session, performing the handshake.
    ///
    /// `server_name` is used for SNI and certificate verification.
    fn connect_tls(
        &self,
        stream: Box<dyn NetworkStream>,
        server_name: &str,
    ) -> Result<Box<dyn NetworkStream>>;
}
