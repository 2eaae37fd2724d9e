//! Main analysis API.
//!
//! This module provides the primary API for deriving a design specification
//! from a web page. The main entry point is the [`Analyzer`] struct, along
//! with the convenience functions [`analyze`] and [`analyze_html`].
//!
//! # Example
//!
//! ```rust,no_run
//! use sitespec_core::analyze::analyze;
//!
//! let result = analyze("example.com")?;
//! println!("{} uses {:?}", result.title, result.fonts.names);
//! # Ok::<(), sitespec_core::SitespecError>(())
//! ```

use url::Url;

use crate::analysis::AnalysisResult;
use crate::color::extract_colors;
use crate::css::aggregate_css;
use crate::fetch::{FetchConfig, Fetcher, HttpFetcher};
use crate::fonts::extract_fonts;
use crate::icons::{extract_icons, extract_splash_screen};
use crate::links::extract_links;
use crate::parse::Document;
use crate::ui_specs::extract_ui_specs;
use crate::{Result, SitespecError};

/// Configuration for the [`Analyzer`].
///
/// # Example
///
/// ```rust
/// use sitespec_core::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .timeout(30)
///     .max_fonts(5)
///     .probe_favicon(false)
///     .build();
/// assert_eq!(config.fetch.timeout, 30);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// HTTP settings for the page, stylesheet and favicon requests.
    pub fetch: FetchConfig,

    /// Maximum number of font families reported (default: 10).
    pub max_fonts: usize,

    /// Nesting limit for `@import` inlining (default: 3).
    pub max_import_depth: usize,

    /// Number of `style=` attributes inspected for fonts (default: 10).
    pub max_style_attributes: usize,

    /// Maximum link text length in characters (default: 200).
    pub max_link_text: usize,

    /// Characters of link text used to tell duplicate links apart (default: 50).
    pub link_key_chars: usize,

    /// Whether to probe `/favicon.ico` when no icon link is found (default: true).
    pub probe_favicon: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            max_fonts: 10,
            max_import_depth: 3,
            max_style_attributes: 10,
            max_link_text: 200,
            link_key_chars: 50,
            probe_favicon: true,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a new builder for AnalyzerConfig.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::new()
    }
}

/// Builder for AnalyzerConfig.
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: AnalyzerConfig::default() }
    }

    /// Replaces the whole fetch configuration.
    pub fn fetch(mut self, value: FetchConfig) -> Self {
        self.config.fetch = value;
        self
    }

    /// Sets the page and stylesheet timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    pub fn max_fonts(mut self, value: usize) -> Self {
        self.config.max_fonts = value;
        self
    }

    pub fn max_import_depth(mut self, value: usize) -> Self {
        self.config.max_import_depth = value;
        self
    }

    pub fn max_style_attributes(mut self, value: usize) -> Self {
        self.config.max_style_attributes = value;
        self
    }

    pub fn max_link_text(mut self, value: usize) -> Self {
        self.config.max_link_text = value;
        self
    }

    pub fn link_key_chars(mut self, value: usize) -> Self {
        self.config.link_key_chars = value;
        self
    }

    /// Sets whether to probe `/favicon.ico`.
    pub fn probe_favicon(mut self, value: bool) -> Self {
        self.config.probe_favicon = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> AnalyzerConfig {
        self.config
    }
}

impl Default for AnalyzerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefixes `https://` unless the input already starts with `http://` or
/// `https://`.
///
/// ```rust
/// use sitespec_core::analyze::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.com"), "https://example.com");
/// assert_eq!(ensure_scheme("http://example.com"), "http://example.com");
/// ```
pub fn ensure_scheme(url: &str) -> String {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| SitespecError::InvalidUrl(format!("{}: {}", url, e)))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(SitespecError::InvalidUrl(format!("{}: missing host", url))),
    }
}

/// Main entry point for page analysis.
///
/// An analyzer owns its configuration and the [`Fetcher`] every network
/// request goes through. Each call to [`Analyzer::analyze`] is independent:
/// nothing is cached between calls.
///
/// # Example
///
/// ```rust,no_run
/// use sitespec_core::{Analyzer, AnalyzerConfig};
///
/// let analyzer = Analyzer::with_config(AnalyzerConfig::builder().timeout(20).build())?;
/// let result = analyzer.analyze("https://example.com")?;
/// println!("primary color: {:?}", result.colors.primary);
/// # Ok::<(), sitespec_core::SitespecError>(())
/// ```
pub struct Analyzer {
    config: AnalyzerConfig,
    fetcher: Box<dyn Fetcher>,
}

impl Analyzer {
    /// Creates an analyzer with default settings and an HTTP fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`SitespecError::HttpError`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_config(AnalyzerConfig::default())
    }

    /// Creates an analyzer with a custom configuration and an HTTP fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`SitespecError::HttpError`] if the HTTP client cannot be built.
    pub fn with_config(config: AnalyzerConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch.clone())?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Creates an analyzer that performs all I/O through `fetcher`.
    pub fn with_fetcher(config: AnalyzerConfig, fetcher: impl Fetcher + 'static) -> Self {
        Self { config, fetcher: Box::new(fetcher) }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Fetches `url` and analyzes the page.
    ///
    /// A missing scheme is replaced with `https://`. Relative references on
    /// the page resolve against the URL it was finally served from, while
    /// [`AnalysisResult::url`] keeps the requested one.
    ///
    /// # Errors
    ///
    /// Returns [`SitespecError::InvalidUrl`] for an unparsable URL and any
    /// error of [`Fetcher::fetch_page`]. Nothing after the page fetch fails.
    pub fn analyze(&self, url: &str) -> Result<AnalysisResult> {
        let requested = ensure_scheme(url);
        let page_url = parse_url(&requested)?;

        let page = self.fetcher.fetch_page(&page_url)?;
        Ok(self.analyze_page(&page.html, page.final_url, requested))
    }

    /// Analyzes HTML that was obtained elsewhere, resolving against `url`.
    ///
    /// Linked stylesheets and the favicon probe still go through the fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`SitespecError::InvalidUrl`] if `url` cannot be parsed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sitespec_core::{Analyzer, AnalyzerConfig};
    ///
    /// let config = AnalyzerConfig::builder().probe_favicon(false).build();
    /// let analyzer = Analyzer::with_config(config).unwrap();
    /// let html = r#"<title>Acme</title><style>:root { --primary-color: #FF5722 }</style>"#;
    ///
    /// let result = analyzer.analyze_html(html, "https://acme.test").unwrap();
    /// assert_eq!(result.title, "Acme");
    /// assert_eq!(result.colors.primary.as_deref(), Some("#ff5722"));
    /// ```
    pub fn analyze_html(&self, html: &str, url: &str) -> Result<AnalysisResult> {
        let requested = ensure_scheme(url);
        let base_url = parse_url(&requested)?;
        Ok(self.analyze_page(html, base_url, requested))
    }

    fn analyze_page(&self, html: &str, base_url: Url, requested: String) -> AnalysisResult {
        let fetcher = self.fetcher.as_ref();
        let config = &self.config;

        let doc = Document::parse(html, base_url);
        let css = aggregate_css(&doc, fetcher, config.max_import_depth);

        let result = AnalysisResult {
            url: requested,
            title: doc.extract_title(),
            description: doc.extract_description(),
            icons: extract_icons(&doc, &css, fetcher, config),
            splash_screen: extract_splash_screen(&doc, &css),
            fonts: extract_fonts(&doc, &css, config),
            colors: extract_colors(&css),
            ui_specs: extract_ui_specs(&css),
            links: extract_links(&doc, config),
        };

        tracing::info!(
            url = %result.url,
            final_url = %doc.base_url(),
            stylesheets = css.sources().len(),
            fonts = result.fonts.names.len(),
            links = result.links.len(),
            "analysis complete"
        );
        result
    }
}

/// Fetches and analyzes `url` with default settings.
///
/// # Errors
///
/// See [`Analyzer::analyze`].
pub fn analyze(url: &str) -> Result<AnalysisResult> {
    Analyzer::new()?.analyze(url)
}

/// Analyzes `html` as if served from `url`, with default settings.
///
/// # Errors
///
/// See [`Analyzer::analyze_html`].
pub fn analyze_html(html: &str, url: &str) -> Result<AnalysisResult> {
    Analyzer::new()?.analyze_html(html, url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::UNKNOWN_TITLE;
    use crate::testing::StaticFetcher;
    use rstest::rstest;

    const PAGE_HTML: &str = r##"
        <!DOCTYPE html>
        <html>
        <head>
            <meta property="og:title" content="Acme">
            <meta name="description" content="Rockets for everyone">
            <meta name="theme-color" content="#0B1D3A">
            <link rel="stylesheet" href="/css/site.css">
            <link rel="apple-touch-icon" sizes="180x180" href="/apple.png">
            <style>
                :root { --primary-color: #1A2b3C; }
                .card { box-shadow: 2px 4px 6px 0px #000000; border-radius: 8px; }
            </style>
        </head>
        <body>
            <a href="/a">Home</a>
            <a href="/a">Go Home</a>
            <a href="https://elsewhere.test/">Elsewhere</a>
        </body>
        </html>
    "##;

    const SITE_CSS: &str = r#"
        @import url("fonts.css");
        body { font-family: "Inter", sans-serif; margin: 0; }
        .btn-secondary { background-color: #FF5722; }
    "#;

    const FONTS_CSS: &str = "@font-face { font-family: 'Inter'; src: url(inter.woff2) format('woff2'); }";

    fn fetcher() -> StaticFetcher {
        StaticFetcher::new()
            .page("https://acme.test/", PAGE_HTML)
            .css("https://acme.test/css/site.css", SITE_CSS)
            .css("https://acme.test/css/fonts.css", FONTS_CSS)
    }

    #[test]
    fn test_analyzer_config_default() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.max_fonts, 10);
        assert_eq!(config.max_import_depth, 3);
        assert_eq!(config.max_style_attributes, 10);
        assert_eq!(config.max_link_text, 200);
        assert_eq!(config.link_key_chars, 50);
        assert!(config.probe_favicon);
        assert_eq!(config.fetch.timeout, 10);
        assert_eq!(config.fetch.probe_timeout, 5);
    }

    #[test]
    fn test_analyzer_config_builder() {
        let config = AnalyzerConfig::builder()
            .timeout(30)
            .user_agent("sitespec-test")
            .max_fonts(3)
            .max_import_depth(1)
            .max_link_text(20)
            .link_key_chars(5)
            .probe_favicon(false)
            .build();

        assert_eq!(config.fetch.timeout, 30);
        assert_eq!(config.fetch.user_agent, "sitespec-test");
        assert_eq!(config.max_fonts, 3);
        assert_eq!(config.max_import_depth, 1);
        assert_eq!(config.max_link_text, 20);
        assert_eq!(config.link_key_chars, 5);
        assert!(!config.probe_favicon);
    }

    #[rstest]
    #[case("example.com", "https://example.com")]
    #[case("  example.com/path ", "https://example.com/path")]
    #[case("http://example.com", "http://example.com")]
    #[case("HTTPS://example.com", "HTTPS://example.com")]
    fn test_ensure_scheme(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(ensure_scheme(input), expected);
    }

    #[test]
    fn test_analyze_full_page() {
        let analyzer = Analyzer::with_fetcher(AnalyzerConfig::default(), fetcher());
        let result = analyzer.analyze("acme.test").unwrap();

        assert_eq!(result.url, "https://acme.test");
        assert_eq!(result.title, "Acme");
        assert_eq!(result.description, "Rockets for everyone");
        assert_eq!(result.icons.front_icon.as_deref(), Some("https://acme.test/apple.png"));
        assert_eq!(result.icons.background_color.as_deref(), Some("#0b1d3a"));
        assert_eq!(result.splash_screen.icon.as_deref(), Some("https://acme.test/apple.png"));
        assert_eq!(result.splash_screen.color.as_deref(), Some("#0b1d3a"));

        assert_eq!(result.fonts.names, vec!["Inter"]);
        assert_eq!(result.fonts.urls["Inter"].as_deref(), Some("https://acme.test/css/inter.woff2"));

        assert_eq!(result.colors.primary.as_deref(), Some("#1a2b3c"));
        assert_eq!(result.colors.secondary.as_deref(), Some("#ff5722"));

        assert_eq!(result.ui_specs.shadow.color.as_deref(), Some("#000000"));
        assert_eq!(result.ui_specs.shadow.angle.as_deref(), Some("63.4°"));
        assert_eq!(result.ui_specs.corner_radius.as_deref(), Some("8px"));
        assert_eq!(result.ui_specs.item_spacing.as_deref(), Some("0"));

        assert_eq!(result.links.len(), 3);
        assert!(result.links[0].is_internal && result.links[1].is_internal);
        assert!(!result.links[2].is_internal);
    }

    #[test]
    fn test_fatal_page_error_stops_analysis() {
        let fetcher = StaticFetcher::new();
        let analyzer = Analyzer::with_fetcher(AnalyzerConfig::default(), fetcher);

        let err = analyzer.analyze("https://missing.test/").unwrap_err();
        assert!(matches!(err, SitespecError::HttpStatus { status: 404, .. }));
    }

    #[rstest]
    #[case("")]
    #[case("http://")]
    #[case("https://exa mple.com")]
    fn test_invalid_url(#[case] input: &str) {
        let analyzer = Analyzer::with_fetcher(AnalyzerConfig::default(), StaticFetcher::new());
        assert!(matches!(analyzer.analyze(input), Err(SitespecError::InvalidUrl(_))));
    }

    #[test]
    fn test_analyze_html_uses_fetcher_for_assets() {
        let fetcher = StaticFetcher::new().css("https://local.test/theme.css", ".primary { color: #123456 }");
        let analyzer = Analyzer::with_fetcher(AnalyzerConfig::default(), fetcher);

        let html = r#"<link rel="stylesheet" href="theme.css"><p>No title here</p>"#;
        let result = analyzer.analyze_html(html, "https://local.test/").unwrap();

        assert_eq!(result.title, UNKNOWN_TITLE);
        assert_eq!(result.description, "");
        assert_eq!(result.colors.primary.as_deref(), Some("#123456"));
        assert_eq!(result.icons.front_icon, None);
    }

    #[test]
    fn test_analyze_html_with_favicon_probe() {
        let fetcher = StaticFetcher::new().reachable("https://local.test/favicon.ico");
        let analyzer = Analyzer::with_fetcher(AnalyzerConfig::default(), fetcher);

        let result = analyzer.analyze_html("<p>hi</p>", "local.test").unwrap();

        assert_eq!(result.icons.front_icon.as_deref(), Some("https://local.test/favicon.ico"));
        assert_eq!(result.icons.front_icon, result.icons.background_icon);
    }
}
