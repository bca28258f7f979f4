//! Fetch client.
//!
//! Turns an absolute URL into a status code and a body. Builtin `about:`
//! pages are answered directly, `file://` goes through the [`Vfs`], and
//! `http://` / `https://` go through the host [`NetworkBackend`] and, for
//! `https`, a [`TlsProvider`]. Failures never surface as errors: they come
//! back as a status (0 for transport problems) with a readable message in
//! the body.

pub mod file;
pub mod http;

use lumen_net::TlsProvider;
use lumen_types::backend::NetworkBackend;
use lumen_vfs::Vfs;

use crate::config::FetchSettings;
use crate::url::{self, Scheme};

/// Builtin page served for `about:home` and `about:blank`.
pub const WELCOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Welcome to Lumen</title></head>
<body>
<h1>Welcome to Lumen</h1>
<p>A small web browser that renders plain HTML.</p>
<hr>
<h2>Try these links:</h2>
<ul>
<li><a href="http://example.com">example.com</a> - A simple test page</li>
<li><a href="http://info.cern.ch">info.cern.ch</a> - The first website ever</li>
<li><a href="http://motherfuckingwebsite.com">motherfuckingwebsite.com</a> - Plain HTML at its finest</li>
</ul>
<hr>
<p>Tip: Click the address bar to type a URL, press Enter to navigate.</p>
<p>Use the back button or Page Up/Down to navigate.</p>
</body>
</html>"#;

// -------------------------------------------------------------------
// FetchResponse
// -------------------------------------------------------------------

/// Outcome of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status, or 0 when no valid response was received.
    pub status: u16,
    /// Page content, or a diagnostic message when the fetch failed.
    pub body: String,
    /// Redirect target, set only for redirect statuses.
    pub location: Option<String>,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            location: None,
        }
    }

    /// A failed fetch carrying a human-readable message.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: message.into(),
            location: None,
        }
    }

    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        Self {
            status,
            body: String::new(),
            location: Some(location.into()),
        }
    }

    /// Whether the caller should follow `location`.
    pub fn is_redirect(&self) -> bool {
        is_redirect_status(self.status) && self.location.is_some()
    }
}

/// Statuses that carry a `Location` worth following.
pub fn is_redirect_status(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

// -------------------------------------------------------------------
// Fetcher
// -------------------------------------------------------------------

/// Something that can retrieve a page.
///
/// The browser controller only talks to this trait, so tests can script
/// responses without a network.
pub trait Fetcher {
    fn fetch(&mut self, url: &str) -> FetchResponse;
}

/// Production fetcher over the host filesystem and network.
pub struct Loader {
    vfs: Box<dyn Vfs>,
    net: Box<dyn NetworkBackend>,
    tls: Option<Box<dyn TlsProvider>>,
    settings: FetchSettings,
}

impl Loader {
    /// A loader without TLS: `https` URLs fail with status 0.
    pub fn new(vfs: Box<dyn Vfs>, net: Box<dyn NetworkBackend>, settings: FetchSettings) -> Self {
        Self {
            vfs,
            net,
            tls: None,
            settings,
        }
    }

    /// Enable `https` through `tls`.
    pub fn with_tls(mut self, tls: Box<dyn TlsProvider>) -> Self {
        self.tls = Some(tls);
        self
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }
}

/// The builtin page for `url`, if it is one.
pub fn builtin_page(url: &str) -> Option<&'static str> {
    match url {
        "about:home" | "about:blank" => Some(WELCOME_PAGE),
        _ => None,
    }
}

impl Fetcher for Loader {
    fn fetch(&mut self, url: &str) -> FetchResponse {
        if let Some(page) = builtin_page(url) {
            return FetchResponse::ok(page);
        }

        let parsed = url::parse(url);
        let response = match parsed.scheme {
            Scheme::File => file::fetch_file(self.vfs.as_ref(), &parsed.path),
            Scheme::Http | Scheme::Https => {
                http::fetch_http(self.net.as_ref(), self.tls.as_deref(), &self.settings, &parsed)
            },
        };
        log::debug!(
            "fetched {url}: status {} ({} bytes)",
            response.status,
            response.body.len()
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html;
    use lumen_net::StdNetworkBackend;
    use lumen_vfs::MemoryVfs;

    fn loader_with(vfs: MemoryVfs) -> Loader {
        Loader::new(
            Box::new(vfs),
            Box::new(StdNetworkBackend::new()),
            FetchSettings::default(),
        )
    }

    #[test]
    fn about_pages_are_builtin() {
        let mut loader = loader_with(MemoryVfs::new());
        let home = loader.fetch("about:home");
        assert_eq!(home.status, 200);
        assert_eq!(home.body, WELCOME_PAGE);
        assert_eq!(loader.fetch("about:blank").body, WELCOME_PAGE);
    }

    #[test]
    fn welcome_page_has_title_and_links() {
        let root = html::parse(WELCOME_PAGE);
        assert_eq!(html::title(&root).as_deref(), Some("Welcome to Lumen"));
        let ul = root.find("ul").unwrap();
        assert_eq!(ul.children.len(), 3);
        assert!(ul.children.iter().all(|li| li.find("a").is_some()));
    }

    #[test]
    fn file_urls_go_through_vfs() {
        let mut vfs = MemoryVfs::new();
        vfs.write("/docs/index.html", b"<p>hi</p>").unwrap();
        let mut loader = loader_with(vfs);
        let resp = loader.fetch("file:///docs/index.html");
        assert_eq!(resp, FetchResponse::ok("<p>hi</p>"));
        assert_eq!(loader.fetch("file:///docs/missing.html").status, 404);
    }

    #[test]
    fn https_without_tls_is_status_zero() {
        let mut loader = loader_with(MemoryVfs::new());
        let resp = loader.fetch("https://127.0.0.1/");
        assert_eq!(resp.status, 0);
        assert!(resp.body.contains("TLS"));
    }

    #[test]
    fn redirect_needs_location() {
        assert!(FetchResponse::redirect(302, "/x").is_redirect());
        assert!(!FetchResponse::error(302, "moved").is_redirect());
        assert!(!FetchResponse::ok("").is_redirect());
        assert!(is_redirect_status(303));
        assert!(!is_redirect_status(304));
    }
}
