//! Anchor collection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::analyze::AnalyzerConfig;
use crate::parse::{Document, Element, Matcher};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Absolute URL with a host.
    pub url: String,
    pub text: String,
    pub title: String,
    pub target: String,
    /// `rel` tokens joined by single spaces.
    pub rel: String,
    pub is_internal: bool,
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Same host and explicit port as `base`.
fn is_internal(url: &Url, base: &Url) -> bool {
    url.host_str() == base.host_str() && url.port() == base.port()
}

/// Visible text, else `title`, else `alt`, else the raw `href`.
fn link_text(anchor: &Element<'_>, href: &str) -> String {
    let text = anchor.trimmed_text();
    if !text.is_empty() {
        return text;
    }
    anchor
        .non_empty_attr("title")
        .or_else(|| anchor.non_empty_attr("alt"))
        .unwrap_or(href)
        .to_string()
}

/// Collects every navigable `<a href>` on the page.
///
/// `javascript:` and fragment-only hrefs are skipped, as are targets without
/// a host (e.g. `mailto:`). Records are unique by URL plus the leading
/// characters of their text, and sorted internal-first, then by URL.
///
/// ```rust
/// use sitespec_core::analyze::AnalyzerConfig;
/// use sitespec_core::links::extract_links;
/// use sitespec_core::parse::Document;
/// use url::Url;
///
/// let html = r#"<a href="https://elsewhere.test/">Out</a> <a href="/about">About</a>"#;
/// let doc = Document::parse(html, Url::parse("https://site.test/").unwrap());
/// let links = extract_links(&doc, &AnalyzerConfig::default());
///
/// assert_eq!(links[0].url, "https://site.test/about");
/// assert!(links[0].is_internal);
/// assert!(!links[1].is_internal);
/// ```
pub fn extract_links(doc: &Document, config: &AnalyzerConfig) -> Vec<LinkRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut links = Vec::new();

    for anchor in doc.find_all("a", &Matcher::HasAttr("href")) {
        let Some(href) = anchor.non_empty_attr("href") else {
            continue;
        };
        if href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:") {
            continue;
        }
        let Some(url) = doc.resolve(href) else {
            tracing::debug!(href, "unresolvable link");
            continue;
        };
        if url.host_str().is_none_or(str::is_empty) {
            continue;
        }

        let text = link_text(&anchor, href);
        let key = (url.to_string(), truncate_chars(&text, config.link_key_chars).to_string());
        if !seen.insert(key) {
            continue;
        }

        links.push(LinkRecord {
            is_internal: is_internal(&url, doc.base_url()),
            url: url.to_string(),
            text: truncate_chars(&text, config.max_link_text).to_string(),
            title: anchor.attr("title").unwrap_or_default().to_string(),
            target: anchor.attr("target").unwrap_or_default().to_string(),
            rel: anchor.rel_tokens().join(" "),
        });
    }

    links.sort_by(|a, b| (!a.is_internal, &a.url).cmp(&(!b.is_internal, &b.url)));
    links
}
