//! In-memory [`Fetcher`] for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use url::Url;

use crate::fetch::{FetchedPage, Fetcher};
use crate::{Result, SitespecError};

#[derive(Default)]
pub(crate) struct StaticFetcher {
    pages: HashMap<String, String>,
    css: HashMap<String, String>,
    reachable: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub(crate) fn css(mut self, url: &str, body: &str) -> Self {
        self.css.insert(url.to_string(), body.to_string());
        self
    }

    pub(crate) fn reachable(mut self, url: &str) -> Self {
        self.reachable.insert(url.to_string());
        self
    }

    /// Every URL requested so far, in order.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn record(&self, url: &Url) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
    }
}

impl Fetcher for StaticFetcher {
    fn fetch_page(&self, url: &Url) -> Result<FetchedPage> {
        self.record(url);
        self.pages
            .get(url.as_str())
            .map(|html| FetchedPage { html: html.clone(), final_url: url.clone() })
            .ok_or_else(|| SitespecError::HttpStatus { url: url.to_string(), status: 404 })
    }

    fn fetch_css(&self, url: &Url) -> Option<String> {
        self.record(url);
        self.css.get(url.as_str()).cloned()
    }

    fn probe(&self, url: &Url) -> bool {
        self.record(url);
        self.reachable.contains(url.as_str())
    }
}
