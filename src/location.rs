//! Page location and channel URL derivation.
//!
//! The channel target is tied to both the page's transport security level
//! and its logical path: a page loaded over TLS always yields a `wss`
//! target (never a silent downgrade, never a silent upgrade from an
//! insecure context), and the page path is carried into the channel path
//! so a channel is never shared across distinct pages.

use crate::error::Error;

/// Where the current page was loaded from.
///
/// This is the explicit stand-in for the ambient `window.location` a
/// hosted script would read: the host environment constructs one and
/// hands it to [`crate::on_page_ready`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// True when the page itself arrived over a secure transport.
    pub secure: bool,
    /// Host (and optional port) the page was served from, e.g. `example.com:8443`.
    pub host: String,
    /// Path of the page resource, always starting with `/`.
    pub path: String,
}

impl PageLocation {
    pub fn new(secure: bool, host: impl Into<String>, path: impl Into<String>) -> Self {
        PageLocation { secure, host: host.into(), path: path.into() }
    }

    /// Parse a full page URL of the form `http(s)://host/path`.
    pub fn parse(page_url: &str) -> Result<Self, Error> {
        let (secure, rest) = if let Some(rest) = page_url.strip_prefix("https://") {
            (true, rest)
        } else if let Some(rest) = page_url.strip_prefix("http://") {
            (false, rest)
        } else {
            return Err(Error::PageUrl {
                url: page_url.to_string(),
                detail: "expected an http:// or https:// scheme".to_string(),
            });
        };

        let (host, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };
        if host.is_empty() {
            return Err(Error::PageUrl {
                url: page_url.to_string(),
                detail: "empty host".to_string(),
            });
        }

        Ok(PageLocation::new(secure, host, path))
    }

    /// Derive the channel target for this page.
    ///
    /// Scheme mirrors the page's own transport security; host is the
    /// page's host; the path is `prefix` (normally `/ws`) concatenated
    /// with the page's own path.
    pub fn channel_url(&self, prefix: &str) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{scheme}://{}{prefix}{}", self.host, self.path)
    }
}
