//! [`TlsProvider`] backed by rustls + ring.
//!
//! Enabled by the `tls-rustls` feature.

use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rustls::{ClientConfig, RootCertStore};
use rustls_pki_types::ServerName;

use lumen_types::backend::NetworkStream;
use lumen_types::error::{LumenError, Result};

use super::tls::TlsProvider;

/// Upper bound on the handshake, measured from `connect_tls`.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a read keeps waiting for the rest of a partly received record.
const RECORD_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared, reusable TLS client configuration (one per process).
pub struct RustlsTlsProvider {
    config: Arc<ClientConfig>,
}

impl RustlsTlsProvider {
    /// Build a provider that trusts Mozilla's root CA bundle.
    pub fn new() -> Self {
        Self::with_root_store(RootCertStore::from_iter(
            webpki_roots::TLS_SERVER_ROOTS.iter().cloned(),
        ))
    }

    /// Build a provider that trusts only the given roots.
    pub fn with_root_store(root_store: RootCertStore) -> Self {
        let config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for RustlsTlsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TlsProvider for RustlsTlsProvider {
    fn connect_tls(
        &self,
        stream: Box<dyn NetworkStream>,
        server_name: &str,
    ) -> Result<Box<dyn NetworkStream>> {
        let sni = ServerName::try_from(server_name.to_owned())
            .map_err(|e| LumenError::Tls(format!("invalid server name: {e}")))?;

        let conn = rustls::ClientConnection::new(Arc::clone(&self.config), sni)
            .map_err(|e| LumenError::Tls(format!("TLS init: {e}")))?;

        let stream = RustlsStream::handshake(conn, stream)?;
        log::debug!("TLS session established with {server_name}");
        Ok(Box::new(stream))
    }
}

// ---------------------------------------------------------------------------
// Adapter: rustls session over a NetworkStream
// ---------------------------------------------------------------------------

/// Outcome of one [`RustlsStream::pull_plaintext`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pull {
    /// Ciphertext was taken in. It may not have completed a record yet.
    Progress,
    /// Nothing arrived before the inner stream's timeout.
    Idle,
    /// The peer sent close_notify or the connection ended.
    Closed,
}

/// A TLS-wrapped network stream.
struct RustlsStream {
    tls: rustls::ClientConnection,
    inner: Box<dyn NetworkStream>,
    /// Decrypted bytes not yet handed to the caller.
    plaintext_buf: Vec<u8>,
}

impl RustlsStream {
    /// Pump I/O until the handshake completes, fails, or times out.
    ///
    /// On failure the inner stream is closed before returning.
    fn handshake(
        mut tls: rustls::ClientConnection,
        mut inner: Box<dyn NetworkStream>,
    ) -> Result<Self> {
        let deadline = Instant::now() + HANDSHAKE_TIMEOUT;
        let outcome = pump_handshake(&mut tls, &mut *inner, deadline);
        if let Err(e) = outcome {
            let _ = inner.close();
            return Err(e);
        }
        Ok(Self {
            tls,
            inner,
            plaintext_buf: Vec::new(),
        })
    }

    /// Move any ciphertext available on the network through rustls and
    /// into `plaintext_buf`.
    fn pull_plaintext(&mut self) -> Result<Pull> {
        let mut adapter = IoAdapter::new(&mut *self.inner);
        match self.tls.read_tls(&mut adapter) {
            Ok(0) => return Ok(Pull::Closed),
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(Pull::Idle),
            Err(e) => return Err(LumenError::Tls(format!("read_tls: {e}"))),
            Ok(_) => {},
        }

        let state = self
            .tls
            .process_new_packets()
            .map_err(|e| LumenError::Tls(format!("process: {e}")))?;

        let mut tmp = [0u8; 8192];
        loop {
            match self.tls.reader().read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => self.plaintext_buf.extend_from_slice(&tmp[..n]),
                Err(_) => break,
            }
        }
        if state.peer_has_closed() {
            return Ok(Pull::Closed);
        }
        Ok(Pull::Progress)
    }

    fn drain_into(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.plaintext_buf.len());
        buf[..n].copy_from_slice(&self.plaintext_buf[..n]);
        self.plaintext_buf.drain(..n);
        n
    }
}

fn pump_handshake(
    tls: &mut rustls::ClientConnection,
    inner: &mut dyn NetworkStream,
    deadline: Instant,
) -> Result<()> {
    let mut adapter = IoAdapter::new(inner);
    while tls.is_handshaking() {
        if Instant::now() >= deadline {
            return Err(LumenError::Tls("handshake timed out".to_string()));
        }
        while tls.wants_write() {
            tls.write_tls(&mut adapter)
                .map_err(|e| LumenError::Tls(format!("handshake write: {e}")))?;
        }
        if !tls.is_handshaking() {
            break;
        }
        match tls.read_tls(&mut adapter) {
            Ok(0) => return Err(LumenError::Tls("peer closed during handshake".to_string())),
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                std::thread::sleep(Duration::from_millis(1));
                continue;
            },
            Err(e) => return Err(LumenError::Tls(format!("handshake read: {e}"))),
            Ok(_) => {},
        }
        tls.process_new_packets()
            .map_err(|e| LumenError::Tls(format!("handshake: {e}")))?;
    }
    // Flush the final flight (client Finished).
    while tls.wants_write() {
        tls.write_tls(&mut adapter)
            .map_err(|e| LumenError::Tls(format!("handshake write: {e}")))?;
    }
    Ok(())
}

impl NetworkStream for RustlsStream {
    /// Returns `Ok(0)` only when nothing arrived, or when the peer closed.
    /// Once ciphertext starts arriving the read keeps pulling until a whole
    /// record has decrypted, so a record split across TCP segments never
    /// looks like a quiet connection.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut partial_since: Option<Instant> = None;
        while self.plaintext_buf.is_empty() {
            match self.pull_plaintext()? {
                Pull::Closed => break,
                Pull::Progress => {
                    partial_since.get_or_insert_with(Instant::now);
                },
                Pull::Idle => match partial_since {
                    Some(start) if start.elapsed() < RECORD_TIMEOUT => {
                        std::thread::sleep(Duration::from_millis(1));
                    },
                    _ => break,
                },
            }
        }
        Ok(self.drain_into(buf))
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let n = self
            .tls
            .writer()
            .write(data)
            .map_err(|e| LumenError::Tls(format!("write: {e}")))?;

        let mut adapter = IoAdapter::new(&mut *self.inner);
        while self.tls.wants_write() {
            self.tls
                .write_tls(&mut adapter)
                .map_err(|e| LumenError::Tls(format!("write_tls: {e}")))?;
        }
        Ok(n)
    }

    fn close(&mut self) -> Result<()> {
        self.tls.send_close_notify();
        let mut adapter = IoAdapter::new(&mut *self.inner);
        let _ = self.tls.write_tls(&mut adapter);
        self.inner.close()
    }
}

// ---------------------------------------------------------------------------
// IoAdapter: NetworkStream as std::io::Read + Write
// ---------------------------------------------------------------------------

/// Lets rustls call `std::io` on a `&mut dyn NetworkStream`.
///
/// The stream reports "nothing yet" as `Ok(0)`; rustls would read that as
/// EOF, so it is surfaced as `WouldBlock` instead.
struct IoAdapter<'a> {
    inner: &'a mut dyn NetworkStream,
}

impl<'a> IoAdapter<'a> {
    fn new(inner: &'a mut dyn NetworkStream) -> Self {
        Self { inner }
    }
}

impl io::Read for IoAdapter<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf) {
            Ok(0) if !buf.is_empty() => Err(io::ErrorKind::WouldBlock.into()),
            Ok(n) => Ok(n),
            Err(LumenError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::other(e.to_string())),
        }
    }
}

impl io::Write for IoAdapter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .write(buf)
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
