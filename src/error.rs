//! Error types shared by every harvest stage.
//!
//! Each variant carries the URL or path it failed on so a single log line is
//! enough to identify the failing step and its cause.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which side of a reference resolution failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlRole {
    /// The page URL links are resolved against (also the fetch target).
    Base,
    /// The link reference taken from an `href` attribute.
    Reference,
}

impl fmt::Display for UrlRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Reference => f.write_str("relative"),
        }
    }
}

/// Coarse error class, used to tell transport failures from server refusals,
/// malformed input and local filesystem trouble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport-level failure, including timeouts.
    Network,
    /// The server answered with something other than `200 OK`.
    BadStatus,
    /// The page body could not be turned into an HTML document.
    Parse,
    /// A base URL or link reference is malformed.
    UrlParse,
    /// Local filesystem failure.
    Io,
}

/// Errors that can occur while fetching the page or downloading a link.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Network-level error (DNS resolution, connection refused, TLS, body read).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL being requested.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Request did not complete within the configured timeout.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP response.
    #[error("bad status: {status_text} fetching {url}")]
    BadStatus {
        /// The URL that returned the status.
        url: String,
        /// Numeric HTTP status code.
        status: u16,
        /// Status line text, e.g. `404 Not Found`.
        status_text: String,
    },

    /// Response body could not be parsed as an HTML document.
    #[error("failed to parse HTML from {url}: {reason}")]
    Parse {
        /// The page URL.
        url: String,
        /// What went wrong.
        reason: String,
    },

    /// Base URL or link reference is malformed.
    #[error("failed to parse {role} URL {input:?}: {source}")]
    UrlParse {
        /// The offending input string.
        input: String,
        /// Whether the base or the reference was malformed.
        role: UrlRole,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// Filesystem error (directory creation, file create, write, flush).
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// The path being written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl HarvestError {
    /// Creates a network error from a reqwest error.
    ///
    /// Timeouts are folded into [`HarvestError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::timeout(url);
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a bad-status error from a response status code.
    pub fn bad_status(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::BadStatus {
            url: url.into(),
            status: status.as_u16(),
            status_text: status.to_string(),
        }
    }

    /// Creates an HTML parse error.
    pub fn parse(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a URL parse error.
    pub fn url_parse(input: impl Into<String>, role: UrlRole, source: url::ParseError) -> Self {
        Self::UrlParse {
            input: input.into(),
            role,
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the taxonomy class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => ErrorKind::Network,
            Self::BadStatus { .. } => ErrorKind::BadStatus,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::UrlParse { .. } => ErrorKind::UrlParse,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}

// No From<reqwest::Error> / From<std::io::Error>: every variant needs the URL
// or path, which the source errors don't carry.
