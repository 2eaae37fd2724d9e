//! Page and stylesheet retrieval.
//!
//! The extraction engine talks to the network only through the [`Fetcher`]
//! trait. [`HttpFetcher`] is the production implementation: a blocking
//! reqwest client that follows redirects and reports the final URL, so
//! relative assets on a redirected page resolve against where the page
//! actually lives.
//!
//! Only [`Fetcher::fetch_page`] can fail. Stylesheets and the favicon probe
//! are optional enrichment and collapse every failure into `None`/`false`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::redirect::Policy;
use url::Url;

use crate::{Result, SitespecError};

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const CSS_ACCEPT: &str = "text/css,*/*;q=0.1";

/// HTTP client configuration for fetching pages and their assets.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Timeout for page and stylesheet requests, in seconds.
    pub timeout: u64,
    /// Timeout for the `/favicon.ico` probe, in seconds.
    pub probe_timeout: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// Maximum number of redirects followed per request.
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 10,
            probe_timeout: 5,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
            max_redirects: 10,
        }
    }
}

/// A fetched HTML document together with the URL it was finally served from.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    /// URL after following redirects. Base for all relative references.
    pub final_url: Url,
}

/// Network capability consumed by the analyzer.
pub trait Fetcher: Send + Sync {
    /// Fetches the page to analyze. Failures here abort the analysis.
    fn fetch_page(&self, url: &Url) -> Result<FetchedPage>;

    /// Best-effort stylesheet download; `None` on any failure.
    fn fetch_css(&self, url: &Url) -> Option<String>;

    /// Returns `true` when a HEAD request to `url` answers with 200.
    fn probe(&self, url: &Url) -> bool;
}

/// [`Fetcher`] backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Builds the underlying HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SitespecError::HttpError`] if the TLS backend cannot be initialized.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn page_error(&self, url: &Url, err: reqwest::Error) -> SitespecError {
        if err.is_timeout() {
            SitespecError::Timeout { url: url.to_string(), timeout: self.config.timeout }
        } else {
            SitespecError::FetchError { url: url.to_string(), source: err }
        }
    }

    fn get(&self, url: &Url, accept: &str) -> reqwest::Result<Response> {
        self.client
            .get(url.clone())
            .header(ACCEPT, accept)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .timeout(Duration::from_secs(self.config.timeout))
            .send()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_page(&self, url: &Url) -> Result<FetchedPage> {
        let response = self.get(url, HTML_ACCEPT).map_err(|e| self.page_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitespecError::HttpStatus { url: url.to_string(), status: status.as_u16() });
        }

        let final_url = response.url().clone();
        let html = response.text().map_err(|e| self.page_error(url, e))?;

        tracing::debug!(url = %url, final_url = %final_url, bytes = html.len(), "fetched page");
        Ok(FetchedPage { html, final_url })
    }

    fn fetch_css(&self, url: &Url) -> Option<String> {
        let response = match self.get(url, CSS_ACCEPT) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "stylesheet fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(url = %url, status = response.status().as_u16(), "stylesheet fetch rejected");
            return None;
        }

        response
            .text()
            .inspect_err(|e| tracing::debug!(url = %url, error = %e, "stylesheet body unreadable"))
            .ok()
    }

    fn probe(&self, url: &Url) -> bool {
        match self
            .client
            .head(url.clone())
            .timeout(Duration::from_secs(self.config.probe_timeout))
            .send()
        {
            Ok(response) => response.status().as_u16() == 200,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "probe failed");
                false
            }
        }
    }
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(path.as_ref()).map_err(SitespecError::from)
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(buffer)
}
