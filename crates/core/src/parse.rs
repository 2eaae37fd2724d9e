//! HTML parsing and typed node queries.
//!
//! This module provides the [`Document`] and [`Element`] types. Extractors
//! query the tree with [`Document::find_first`] / [`Document::find_all`] and
//! an explicit [`Matcher`] instead of ad hoc attribute filtering.
//!
//! # Example
//!
//! ```rust
//! use sitespec_core::parse::{Document, Matcher};
//! use url::Url;
//!
//! let html = r#"
//!     <html>
//!         <head><link rel="Shortcut Icon" href="/favicon.png"></head>
//!         <body><p class="content">Paragraph</p></body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html, Url::parse("https://example.com/").unwrap());
//! let icon = doc.find_first("link", &Matcher::RelContains("icon")).unwrap();
//! assert_eq!(icon.attr("href"), Some("/favicon.png"));
//! ```

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{Result, SitespecError};

/// Attribute predicate used by [`Document::find_first`] and [`Document::find_all`].
#[derive(Debug, Clone)]
pub enum Matcher<'m> {
    /// Matches every element of the requested tag.
    Any,
    /// The attribute is present (its value may be empty).
    HasAttr(&'m str),
    /// The attribute equals the value exactly.
    AttrEquals(&'m str, &'m str),
    /// The attribute equals the value, ignoring ASCII case.
    AttrEqualsIgnoreCase(&'m str, &'m str),
    /// The attribute contains the needle, ignoring ASCII case.
    AttrContains(&'m str, &'m str),
    /// The attribute matches the regex.
    AttrMatches(&'m str, &'m Regex),
    /// Some whitespace-separated `rel` token contains the needle, ignoring ASCII case.
    RelContains(&'m str),
    /// Every inner matcher holds.
    All(Vec<Matcher<'m>>),
}

impl Matcher<'_> {
    /// Tests this matcher against an element.
    pub fn matches(&self, element: &Element<'_>) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::HasAttr(name) => element.attr(name).is_some(),
            Matcher::AttrEquals(name, value) => element.attr(name) == Some(*value),
            Matcher::AttrEqualsIgnoreCase(name, value) => {
                element.attr(name).is_some_and(|v| v.eq_ignore_ascii_case(value))
            }
            Matcher::AttrContains(name, needle) => element
                .attr(name)
                .is_some_and(|v| v.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())),
            Matcher::AttrMatches(name, re) => element.attr(name).is_some_and(|v| re.is_match(v)),
            Matcher::RelContains(needle) => element.rel_contains(needle),
            Matcher::All(matchers) => matchers.iter().all(|m| m.matches(element)),
        }
    }
}

/// A parsed HTML document and the URL it is resolved against.
///
/// # Example
///
/// ```rust
/// use sitespec_core::parse::Document;
/// use url::Url;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html, Url::parse("https://example.com").unwrap());
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
    base_url: Url,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// # Arguments
    ///
    /// * `html` - The HTML content to parse
    /// * `base_url` - The URL relative references are resolved against (the
    ///   post-redirect page URL)
    pub fn parse(html: &str, base_url: Url) -> Self {
        Self { html: Html::parse_document(html), base_url }
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a possibly relative reference against the base URL.
    ///
    /// Returns `None` when the reference cannot be joined.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.base_url.join(href.trim()).ok()
    }

    /// All elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = Element<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Finds the first element with the given tag name that satisfies `matcher`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sitespec_core::parse::{Document, Matcher};
    /// use url::Url;
    ///
    /// let html = r#"<meta property="og:title" content="Acme">"#;
    /// let doc = Document::parse(html, Url::parse("https://example.com").unwrap());
    /// let meta = doc.find_first("meta", &Matcher::AttrEquals("property", "og:title")).unwrap();
    /// assert_eq!(meta.attr("content"), Some("Acme"));
    /// ```
    pub fn find_first(&self, tag: &str, matcher: &Matcher<'_>) -> Option<Element<'_>> {
        self.elements()
            .find(|el| el.tag_name().eq_ignore_ascii_case(tag) && matcher.matches(el))
    }

    /// Finds every element with the given tag name that satisfies `matcher`,
    /// in document order.
    pub fn find_all(&self, tag: &str, matcher: &Matcher<'_>) -> Vec<Element<'_>> {
        self.elements()
            .filter(|el| el.tag_name().eq_ignore_ascii_case(tag) && matcher.matches(el))
            .collect()
    }

    /// Finds every element (any tag) that satisfies `matcher`.
    pub fn find_any(&self, matcher: &Matcher<'_>) -> Vec<Element<'_>> {
        self.elements().filter(|el| matcher.matches(el)).collect()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`SitespecError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel =
            Selector::parse(selector).map_err(|e| SitespecError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Gets the trimmed content of the `<title>` element, if present.
    pub fn title(&self) -> Option<String> {
        self.find_first("title", &Matcher::Any).map(|el| el.text().trim().to_string())
    }

    /// Gets the `content` attribute of the first `<meta>` whose `attr` equals `value`.
    pub fn meta_content(&self, attr: &str, value: &str) -> Option<String> {
        self.find_first("meta", &Matcher::AttrEqualsIgnoreCase(attr, value))
            .and_then(|el| el.attr("content").map(str::to_string))
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use sitespec_core::parse::{Document, Matcher};
/// use url::Url;
///
/// let html = r#"<a href="/docs">Read <b>the</b> docs</a>"#;
/// let doc = Document::parse(html, Url::parse("https://example.com").unwrap());
/// let link = doc.find_first("a", &Matcher::HasAttr("href")).unwrap();
///
/// assert_eq!(link.trimmed_text(), "Read the docs");
/// assert_eq!(link.attr("href"), Some("/docs"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the visible text: every text node trimmed, empty ones dropped,
    /// the rest joined by single spaces.
    pub fn trimmed_text(&self) -> String {
        self.element
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the value of an attribute if it is present and not blank.
    pub fn non_empty_attr(&self, name: &str) -> Option<&'a str> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// The whitespace-separated tokens of the `rel` attribute.
    pub fn rel_tokens(&self) -> Vec<&'a str> {
        self.attr("rel").map(|rel| rel.split_whitespace().collect()).unwrap_or_default()
    }

    /// Whether any `rel` token contains `needle`, ignoring ASCII case.
    pub fn rel_contains(&self, needle: &str) -> bool {
        let needle = needle.to_ascii_lowercase();
        self.rel_tokens().iter().any(|token| token.to_ascii_lowercase().contains(&needle))
    }

    /// Gets the lowercase tag name (e.g., "div", "a", "span").
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }
}
