//! Crate-level error type.

use thiserror::Error;

/// Errors surfaced by initialization and configuration.
///
/// The channel deliberately has no error variant here: `channel::open` is
/// fire-and-forget and all channel failures are reported through logging
/// only (there is no consumer of a result to hand one to).
#[derive(Debug, Error)]
pub enum Error {
    /// A document element the markup contract guarantees was not found.
    ///
    /// This is a contract violation by the server-rendered page, not a
    /// recoverable runtime condition; initialization halts here.
    #[error("required element not found: {selector}")]
    MissingElement { selector: String },

    /// The page URL could not be split into scheme, host, and path.
    #[error("malformed page URL '{url}': {detail}")]
    PageUrl { url: String, detail: String },

    /// A configuration file could not be read.
    #[error("config file could not be read: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// A configuration file could not be parsed as TOML.
    #[error("config file could not be parsed: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
