//! Tests for the networking module.

use std::io::{Read, Write};
use std::net::{IpAddr, Ipv4Addr, TcpListener};
use std::time::Duration;

use lumen_types::backend::{NetworkBackend, NetworkStream};

use super::*;

const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Poll `stream` until some data has arrived and a read comes back empty.
fn read_until_idle(stream: &mut dyn NetworkStream) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = [0u8; 1024];
    for _ in 0..200 {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            if !out.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
            continue;
        }
        out.extend_from_slice(&buf[..n]);
    }
    out
}

// ---------------------------------------------------------------------------
// StdNetworkBackend
// ---------------------------------------------------------------------------

#[test]
fn resolve_ip_literal_skips_dns() {
    let backend = StdNetworkBackend::new();
    assert_eq!(backend.resolve("127.0.0.1").unwrap(), LOCALHOST);
    assert_eq!(
        backend.resolve("::1").unwrap(),
        "::1".parse::<IpAddr>().unwrap()
    );
}

#[test]
fn resolve_invalid_host_fails() {
    let backend = StdNetworkBackend::new();
    let err = backend.resolve("no-such-host.invalid").unwrap_err();
    assert!(err.to_string().contains("no-such-host.invalid"));
}

#[test]
fn connect_refused_is_network_error() {
    let tmp = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = tmp.local_addr().unwrap().port();
    drop(tmp);

    let backend = StdNetworkBackend::new();
    let err = backend.connect(LOCALHOST, port).err().unwrap();
    assert!(err.to_string().contains("TCP connect"));
}

#[test]
fn connect_write_and_read() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = std::thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        let mut buf = [0u8; 64];
        let n = conn.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"ping");
        conn.write_all(b"pong").unwrap();
    });

    let backend = StdNetworkBackend::new();
    let mut stream = backend.connect(LOCALHOST, port).unwrap();
    assert_eq!(stream.write(b"ping").unwrap(), 4);
    assert_eq!(read_until_idle(&mut *stream), b"pong");

    stream.close().unwrap();
    handle.join().unwrap();
}

#[test]
fn idle_read_returns_zero() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = std::thread::spawn(move || {
        let (conn, _) = listener.accept().unwrap();
        std::thread::sleep(Duration::from_millis(200));
        drop(conn);
    });

    let backend = StdNetworkBackend::with_read_timeout(Duration::from_millis(20));
    let mut stream = backend.connect(LOCALHOST, port).unwrap();
    let mut buf = [0u8; 16];
    assert_eq!(stream.read(&mut buf).unwrap(), 0);

    stream.close().unwrap();
    handle.join().unwrap();
}

#[test]
fn close_is_idempotent_and_blocks_writes() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = std::thread::spawn(move || {
        let _ = listener.accept().unwrap();
    });

    let backend = StdNetworkBackend::new();
    let mut stream = backend.connect(LOCALHOST, port).unwrap();
    stream.close().unwrap();
    stream.close().unwrap();
    assert!(stream.write(b"late").is_err());
    let mut buf = [0u8; 4];
    assert_eq!(stream.read(&mut buf).unwrap(), 0);
    handle.join().unwrap();
}

// ---------------------------------------------------------------------------
// RustlsTlsProvider
// ---------------------------------------------------------------------------

#[cfg(feature = "tls-rustls")]
#[test]
fn rustls_round_trip_against_local_server() {
    use std::sync::Arc;

    use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};

    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_der = certified.cert.der().clone();
    let key_der = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(
        certified.key_pair.serialize_der(),
    ));

    let server_config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(vec![cert_der.clone()], key_der)
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = std::thread::spawn(move || {
        let (tcp, _) = listener.accept().unwrap();
        let conn = rustls::ServerConnection::new(Arc::new(server_config)).unwrap();
        let mut tls = rustls::StreamOwned::new(conn, tcp);
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = tls.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        tls.write_all(b"HTTP/1.0 200 OK\r\n\r\nsecret").unwrap();
        tls.conn.send_close_notify();
        tls.flush().unwrap();
        request
    });

    let mut roots = rustls::RootCertStore::empty();
    roots.add(cert_der).unwrap();
    let provider = RustlsTlsProvider::with_root_store(roots);

    let backend = StdNetworkBackend::new();
    let plain = backend.connect(LOCALHOST, port).unwrap();
    let mut stream = provider.connect_tls(plain, "localhost").unwrap();
    stream.write(b"GET / HTTP/1.0\r\nHost: localhost\r\n\r\n").unwrap();

    let response = read_until_idle(&mut *stream);
    assert!(response.starts_with(b"HTTP/1.0 200 OK"));
    assert!(response.ends_with(b"secret"));
    stream.close().unwrap();

    let request = handle.join().unwrap();
    assert!(request.starts_with(b"GET / HTTP/1.0"));
}

#[cfg(feature = "tls-rustls")]
#[test]
fn rustls_rejects_untrusted_certificate() {
    use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
    use std::sync::Arc;

    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let key_der = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(
        certified.key_pair.serialize_der(),
    ));
    let server_config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(vec![certified.cert.der().clone()], key_der)
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = std::thread::spawn(move || {
        let (tcp, _) = listener.accept().unwrap();
        let conn = rustls::ServerConnection::new(Arc::new(server_config)).unwrap();
        let mut tls = rustls::StreamOwned::new(conn, tcp);
        let mut buf = [0u8; 64];
        // The client aborts the handshake, so this read fails or hits EOF.
        let _ = tls.read(&mut buf);
    });

    // Empty trust store: the self-signed certificate cannot verify.
    let provider = RustlsTlsProvider::with_root_store(rustls::RootCertStore::empty());
    let plain = StdNetworkBackend::new().connect(LOCALHOST, port).unwrap();
    let err = provider.connect_tls(plain, "localhost").err().unwrap();
    assert!(err.to_string().contains("TLS"));
    handle.join().unwrap();
}

#[cfg(feature = "tls-rustls")]
#[test]
fn rustls_record_split_across_segments_is_reassembled() {
    use std::sync::Arc;

    use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};

    const HEAD: &[u8] = b"HTTP/1.0 200 OK\r\nContent-Length: 6000\r\n\r\n";
    const BODY_LEN: usize = 6000;

    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_der = certified.cert.der().clone();
    let key_der = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(
        certified.key_pair.serialize_der(),
    ));
    let server_config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(vec![cert_der.clone()], key_der)
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = std::thread::spawn(move || {
        let (tcp, _) = listener.accept().unwrap();
        tcp.set_nodelay(true).unwrap();
        let conn = rustls::ServerConnection::new(Arc::new(server_config)).unwrap();
        let mut tls = rustls::StreamOwned::new(conn, tcp);
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = tls.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        // Encrypt the head and the body as separate records, then send the
        // body record in two halves.
        let rustls::StreamOwned { mut conn, mut sock } = tls;
        let mut head = Vec::new();
        conn.writer().write_all(HEAD).unwrap();
        while conn.wants_write() {
            conn.write_tls(&mut head).unwrap();
        }
        let mut record = Vec::new();
        conn.writer().write_all(&[b'x'; BODY_LEN]).unwrap();
        while conn.wants_write() {
            conn.write_tls(&mut record).unwrap();
        }
        let (first, second) = record.split_at(record.len() / 2);

        sock.write_all(&head).unwrap();
        sock.write_all(first).unwrap();
        std::thread::sleep(Duration::from_millis(100));
        sock.write_all(second).unwrap();

        conn.send_close_notify();
        let mut tail = Vec::new();
        while conn.wants_write() {
            conn.write_tls(&mut tail).unwrap();
        }
        let _ = sock.write_all(&tail);
    });

    let mut roots = rustls::RootCertStore::empty();
    roots.add(cert_der).unwrap();
    let provider = RustlsTlsProvider::with_root_store(roots);

    let plain = StdNetworkBackend::new().connect(LOCALHOST, port).unwrap();
    let mut stream = provider.connect_tls(plain, "localhost").unwrap();
    stream.write(b"GET / HTTP/1.0\r\nHost: localhost\r\n\r\n").unwrap();

    let response = read_until_idle(&mut *stream);
    assert_eq!(response.len(), HEAD.len() + BODY_LEN);
    assert!(response.starts_with(HEAD));
    assert!(response[HEAD.len()..].iter().all(|&b| b == b'x'));
    stream.close().unwrap();
    handle.join().unwrap();
}
