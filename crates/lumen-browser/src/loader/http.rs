//! Minimal HTTP/1.0 GET client over the host network traits.
//!
//! One request per connection (`Connection: close`). The response is read
//! by polling the stream: a read that returns nothing counts as idle, and
//! once any data has arrived an idle read ends the response.

use std::thread;
use std::time::Duration;

use lumen_net::TlsProvider;
use lumen_types::backend::{NetworkBackend, NetworkStream};
use lumen_types::error::{LumenError, Result};

use super::{FetchResponse, is_redirect_status};
use crate::config::FetchSettings;
use crate::url::{ParsedUrl, Scheme};

/// Bytes requested per read.
const READ_CHUNK: usize = 4096;

/// Fetch a `http` or `https` URL.
///
/// Every failure before a response is parsed yields status 0 with a
/// diagnostic body. The stream is closed on every path once connected.
pub fn fetch_http(
    net: &dyn NetworkBackend,
    tls: Option<&dyn TlsProvider>,
    settings: &FetchSettings,
    url: &ParsedUrl,
) -> FetchResponse {
    let Some(host) = url.host.as_deref().filter(|h| !h.is_empty()) else {
        return FetchResponse::error(0, format!("No host in URL: {url}"));
    };
    let https = url.scheme == Scheme::Https;
    if https && tls.is_none() {
        return FetchResponse::error(0, format!("HTTPS is not available (no TLS support): {url}"));
    }
    let port = url.port.or(url.scheme.default_port()).unwrap_or(80);

    let addr = match net.resolve(host) {
        Ok(addr) => addr,
        Err(e) => {
            log::debug!("resolve {host}: {e}");
            return FetchResponse::error(0, format!("DNS lookup failed for {host}"));
        },
    };

    let stream = match net.connect(addr, port) {
        Ok(stream) => stream,
        Err(e) => {
            log::debug!("connect {addr}:{port}: {e}");
            return FetchResponse::error(0, format!("Connection failed to {host}"));
        },
    };
    let mut stream = match tls {
        Some(tls) if https => match tls.connect_tls(stream, host) {
            Ok(stream) => stream,
            Err(e) => {
                log::debug!("TLS handshake with {host}: {e}");
                return FetchResponse::error(0, format!("Secure connection failed to {host}: {e}"));
            },
        },
        _ => stream,
    };

    let request = build_request(url, host, &settings.user_agent);
    let result = send_all(stream.as_mut(), request.as_bytes())
        .and_then(|()| read_response(stream.as_mut(), settings));
    if let Err(e) = stream.close() {
        log::warn!("closing connection to {host}: {e}");
    }

    match result {
        Ok(raw) => {
            log::debug!("received {} bytes from {host}", raw.len());
            parse_response(&raw)
        },
        Err(e) => FetchResponse::error(0, e.to_string()),
    }
}

/// The request head. The `Host` header carries the port only when it is
/// not the scheme default.
pub fn build_request(url: &ParsedUrl, host: &str, user_agent: &str) -> String {
    let host_header = match url.port {
        Some(port) if Some(port) != url.scheme.default_port() => format!("{host}:{port}"),
        _ => host.to_string(),
    };
    format!(
        "GET {} HTTP/1.0\r\n\
         Host: {host_header}\r\n\
         User-Agent: {user_agent}\r\n\
         Connection: close\r\n\
         \r\n",
        url.path
    )
}

fn send_all(stream: &mut dyn NetworkStream, mut data: &[u8]) -> Result<()> {
    while !data.is_empty() {
        let n = stream.write(data)?;
        if n == 0 {
            return Err(LumenError::Network("connection closed while sending request".to_string()));
        }
        data = &data[n..];
    }
    Ok(())
}

/// Read until the server goes quiet after sending something, or until the
/// `Content-Length` body is complete.
///
/// Gives up after `idle_limit` empty reads only when nothing at all has
/// arrived.
fn read_response(stream: &mut dyn NetworkStream, settings: &FetchSettings) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    let mut idle = 0;

    loop {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            if !data.is_empty() {
                break;
            }
            idle += 1;
            if idle >= settings.idle_limit {
                return Err(LumenError::Network("Timed out waiting for response".to_string()));
            }
            thread::sleep(Duration::from_millis(settings.idle_sleep_ms));
        } else {
            data.extend_from_slice(&chunk[..n]);
            if data.len() > settings.max_response_bytes {
                return Err(LumenError::Network(format!(
                    "Response larger than {} bytes",
                    settings.max_response_bytes
                )));
            }
            if body_complete(&data) {
                break;
            }
            idle = 0;
        }
        thread::yield_now();
    }
    Ok(data)
}

/// Whether `data` holds a full header block plus its declared
/// `Content-Length` of body.
fn body_complete(data: &[u8]) -> bool {
    let Some(sep) = find_subsequence(data, b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&data[..sep]);
    let headers = parse_headers(&head);
    find_header(&headers, "content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .is_some_and(|len| data.len() - (sep + 4) >= len)
}

// -------------------------------------------------------------------
// Response parsing
// -------------------------------------------------------------------

/// Parse a raw response.
///
/// Status 0 means there was no header/body separator. Redirects with a
/// `Location` come back as [`FetchResponse::redirect`] without a body.
pub fn parse_response(data: &[u8]) -> FetchResponse {
    let Some(sep) = find_subsequence(data, b"\r\n\r\n") else {
        return FetchResponse::error(0, "Invalid HTTP response");
    };
    let head = String::from_utf8_lossy(&data[..sep]);
    let raw_body = &data[sep + 4..];

    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .unwrap_or(0);
    let headers = parse_headers(&head);

    if is_redirect_status(status)
        && let Some(location) = find_header(&headers, "location")
    {
        log::debug!("redirect {status} -> {location}");
        return FetchResponse::redirect(status, location);
    }

    let body = if find_header(&headers, "transfer-encoding")
        .is_some_and(|v| v.to_ascii_lowercase().contains("chunked"))
    {
        decode_chunked(raw_body)
    } else if let Some(len) =
        find_header(&headers, "content-length").and_then(|v| v.parse::<usize>().ok())
    {
        raw_body[..raw_body.len().min(len)].to_vec()
    } else {
        raw_body.to_vec()
    };

    FetchResponse {
        status,
        body: String::from_utf8_lossy(&body).into_owned(),
        location: None,
    }
}

/// Header lines after the status line as `(lowercased name, value)`.
fn parse_headers(head: &str) -> Vec<(String, String)> {
    head.split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect()
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Decode a chunked body. A malformed size line ends the body; a short
/// final chunk keeps what arrived.
fn decode_chunked(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut pos = 0;

    while let Some(i) = find_subsequence(&data[pos..], b"\r\n") {
        let line_end = pos + i;
        let line = String::from_utf8_lossy(&data[pos..line_end]);
        let size = line.split(';').next().unwrap_or("").trim();
        let Ok(size) = usize::from_str_radix(size, 16) else {
            break;
        };
        if size == 0 {
            break;
        }

        let start = line_end + 2;
        let end = start.saturating_add(size);
        if end > data.len() {
            out.extend_from_slice(&data[start.min(data.len())..]);
            break;
        }
        out.extend_from_slice(&data[start..end]);
        pos = (end + 2).min(data.len());
    }
    out
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
