//! URL parsing and relative resolution.
//!
//! Only three schemes are understood: `file`, `http` and `https`. Anything
//! without one of those prefixes is treated as `http` with the whole string
//! taken as host and path. `about:` URLs never get here; the fetch client
//! answers them directly.

use std::fmt;

/// Schemes the resolver recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    File,
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Port used when the URL does not name one. `None` for `file`.
    pub fn default_port(self) -> Option<u16> {
        match self {
            Self::File => None,
            Self::Http => Some(80),
            Self::Https => Some(443),
        }
    }
}

/// A URL split into its parts.
///
/// `host` and `port` are `None` for `file` URLs. For network URLs the port
/// is always filled in, falling back to the scheme default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub scheme: Scheme,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
}

/// Prefixes that mark a URL as already absolute.
const ABSOLUTE_PREFIXES: [&str; 4] = ["http://", "https://", "file://", "about:"];

/// Whether `url` starts with a recognized scheme (including `about:`).
pub fn has_scheme(url: &str) -> bool {
    ABSOLUTE_PREFIXES.iter().any(|p| url.starts_with(p))
}

/// Split `url` into scheme, host, port and path.
pub fn parse(url: &str) -> ParsedUrl {
    if let Some(path) = url.strip_prefix("file://") {
        return ParsedUrl {
            scheme: Scheme::File,
            host: None,
            port: None,
            path: path.to_string(),
        };
    }

    let (scheme, rest) = if let Some(rest) = url.strip_prefix("https://") {
        (Scheme::Https, rest)
    } else if let Some(rest) = url.strip_prefix("http://") {
        (Scheme::Http, rest)
    } else {
        (Scheme::Http, url)
    };

    let (host_port, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, "/"),
    };

    let default_port = scheme.default_port();
    let (host, port) = match host_port.split_once(':') {
        Some((host, port)) => (host, port.parse().ok().or(default_port)),
        None => (host_port, default_port),
    };

    ParsedUrl {
        scheme,
        host: Some(host.to_string()),
        port,
        path: path.to_string(),
    }
}

impl ParsedUrl {
    /// Directory part of the path: everything up to and including the last
    /// `/`.
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(i) => &self.path[..=i],
            None => "",
        }
    }

    /// `scheme://host[:port]`, omitting the port when it is the default.
    /// Empty for `file` URLs.
    fn origin(&self) -> String {
        let Some(host) = &self.host else {
            return String::new();
        };
        match self.port {
            Some(p) if Some(p) != self.scheme.default_port() => {
                format!("{}://{host}:{p}", self.scheme.as_str())
            },
            _ => format!("{}://{host}", self.scheme.as_str()),
        }
    }

    fn with_path(&self, path: &str) -> String {
        match self.scheme {
            Scheme::File => format!("file://{path}"),
            Scheme::Http | Scheme::Https => format!("{}{path}", self.origin()),
        }
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.with_path(&self.path))
    }
}

/// Resolve `relative` against `base` into an absolute URL.
///
/// URLs that already carry a scheme come back unchanged. With an empty base
/// (nothing loaded yet) `relative` itself is parsed, so a bare host like
/// `example.com` becomes `http://example.com/`.
pub fn resolve(base: &str, relative: &str) -> String {
    if has_scheme(relative) {
        return relative.to_string();
    }
    if base.is_empty() {
        return parse(relative).to_string();
    }

    let base = parse(base);
    if relative.starts_with('/') {
        base.with_path(relative)
    } else {
        let mut path = base.directory().to_string();
        if !path.ends_with('/') {
            path.push('/');
        }
        path.push_str(relative);
        base.with_path(&path)
    }
}
