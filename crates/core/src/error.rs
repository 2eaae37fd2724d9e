//! Error types for sitespec operations.
//!
//! This module defines [`SitespecError`], the only error an analysis can
//! surface. Only the page fetch (and a malformed input URL) is fatal: every
//! extractor downstream of it degrades to "unknown" instead of failing.
//!
//! # Example
//!
//! ```rust
//! use sitespec_core::{SitespecError, Result};
//!
//! fn require_host(url: &url::Url) -> Result<&str> {
//!     url.host_str().ok_or_else(|| SitespecError::InvalidUrl(url.to_string()))
//! }
//! # let url = url::Url::parse("https://example.com").unwrap();
//! # assert_eq!(require_host(&url).unwrap(), "example.com");
//! ```

use thiserror::Error;

/// Main error type for design-spec extraction.
///
/// # Example
///
/// ```rust,no_run
/// use sitespec_core::{SitespecError, analyze};
///
/// match analyze("https://example.com") {
///     Ok(result) => println!("{}", result.title),
///     Err(SitespecError::HttpStatus { status, .. }) => println!("server said {}", status),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum SitespecError {
    /// The page could not be retrieved.
    ///
    /// Wraps DNS failures, refused connections, TLS problems and malformed
    /// responses from the page request.
    #[error("Failed to fetch {url}: {source}")]
    FetchError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page answered with a non-success status code.
    #[error("Fetching {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Request timeout.
    ///
    /// Returned when the page request exceeds the configured timeout duration.
    #[error("Request to {url} timed out after {timeout} seconds")]
    Timeout { url: String, timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client construction errors from reqwest.
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid CSS selector passed to the document query API.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Reading local input failed.
    #[error("Failed to read input: {0}")]
    ReadError(#[from] std::io::Error),

    /// Rendering an [`AnalysisResult`](crate::AnalysisResult) failed.
    #[error("Failed to serialize result: {0}")]
    SerializeError(String),
}

impl From<serde_json::Error> for SitespecError {
    fn from(err: serde_json::Error) -> Self {
        SitespecError::SerializeError(err.to_string())
    }
}

/// Result type alias for SitespecError.
pub type Result<T> = std::result::Result<T, SitespecError>;
