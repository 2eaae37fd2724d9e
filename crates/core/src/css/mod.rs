//! Stylesheet aggregation.
//!
//! Every CSS heuristic runs over one canonical text: inline `<style>` blocks
//! followed by linked stylesheets, with `@import` chains inlined. The text is
//! kept as a list of [`CssSource`] fragments so each piece remembers the URL
//! it was served from; `url(...)` references inside an imported sheet are
//! relative to that sheet, not to the page.

pub mod aggregate;
pub mod patterns;

pub use aggregate::{aggregate_css, expand_imports};

use url::Url;

use patterns::CSS_URL;

/// One unit of CSS text and the URL its relative references resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssSource {
    pub content: String,
    pub base_url: Url,
}

impl CssSource {
    pub fn new(content: impl Into<String>, base_url: Url) -> Self {
        Self { content: content.into(), base_url }
    }
}

/// The aggregated CSS of a page.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    sources: Vec<CssSource>,
    text: String,
}

impl StyleSheet {
    pub fn new(sources: Vec<CssSource>) -> Self {
        let text = sources
            .iter()
            .map(|source| source.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Self { sources, text }
    }

    /// Fragments in collection order.
    pub fn sources(&self) -> &[CssSource] {
        &self.sources
    }

    /// The concatenated CSS text consumed by the heuristics.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Rewrites every `url(...)` reference in `css` to an absolute URL.
///
/// `data:` URIs and references that already carry a scheme are left as they
/// are, as is anything that cannot be joined with `base`.
///
/// ```rust
/// use sitespec_core::css::absolutize_urls;
/// use url::Url;
///
/// let base = Url::parse("https://cdn.example.com/css/site.css").unwrap();
/// let css = "src: url('../fonts/a.woff2'), url(data:font/woff;base64,AA==)";
/// assert_eq!(
///     absolutize_urls(css, &base),
///     "src: url(\"https://cdn.example.com/fonts/a.woff2\"), url(data:font/woff;base64,AA==)"
/// );
/// ```
pub fn absolutize_urls(css: &str, base: &Url) -> String {
    CSS_URL
        .replace_all(css, |caps: &regex::Captures<'_>| {
            let target = caps[1].trim();
            if Url::parse(target).is_ok() {
                return caps[0].to_string();
            }
            match base.join(target) {
                Ok(absolute) => format!("url(\"{}\")", absolute),
                Err(_) => caps[0].to_string(),
            }
        })
        .into_owned()
}
