//! [`NetworkBackend`] over `std::net`.

use std::io::{self, Read, Write};
use std::net::{IpAddr, Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use lumen_types::backend::{NetworkBackend, NetworkStream};
use lumen_types::error::{LumenError, Result};

/// TCP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a single read waits before reporting "nothing yet".
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(250);

/// DNS through the system resolver, TCP through `std::net::TcpStream`.
#[derive(Debug, Clone)]
pub struct StdNetworkBackend {
    read_timeout: Duration,
}

impl StdNetworkBackend {
    pub fn new() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Override the per-read wait used by streams this backend opens.
    pub fn with_read_timeout(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }
}

impl Default for StdNetworkBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkBackend for StdNetworkBackend {
    fn resolve(&self, host: &str) -> Result<IpAddr> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(ip);
        }
        let addr = (host, 0)
            .to_socket_addrs()
            .map_err(|e| LumenError::Network(format!("DNS resolution failed for {host}: {e}")))?
            .next()
            .ok_or_else(|| LumenError::Network(format!("no addresses for {host}")))?;
        log::debug!("resolved {host} -> {}", addr.ip());
        Ok(addr.ip())
    }

    fn connect(&self, addr: IpAddr, port: u16) -> Result<Box<dyn NetworkStream>> {
        let sock = SocketAddr::new(addr, port);
        let stream = TcpStream::connect_timeout(&sock, CONNECT_TIMEOUT)
            .map_err(|e| LumenError::Network(format!("TCP connect to {sock} failed: {e}")))?;
        stream
            .set_read_timeout(Some(self.read_timeout))
            .map_err(|e| LumenError::Network(format!("set read timeout: {e}")))?;
        Ok(Box::new(StdNetworkStream::new(stream)))
    }
}

/// A TCP connection whose reads time out instead of blocking forever.
///
/// A timed-out read is reported as `Ok(0)`, same as end of stream.
pub struct StdNetworkStream {
    stream: TcpStream,
    closed: bool,
}

impl StdNetworkStream {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            closed: false,
        }
    }
}

impl NetworkStream for StdNetworkStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.closed {
            return Ok(0);
        }
        match self.stream.read(buf) {
            Ok(n) => Ok(n),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(0)
            },
            Err(e) => Err(LumenError::Io(e)),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        if self.closed {
            return Err(LumenError::Network("write on closed stream".to_string()));
        }
        Ok(self.stream.write(data)?)
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(LumenError::Io(e)),
        }
    }
}
