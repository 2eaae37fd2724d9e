//! Font family discovery.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analyze::AnalyzerConfig;
use crate::css::patterns::{
    CSS_URL, FONT_FACE_BLOCK, FONT_FAMILY_DECL, FONT_FAMILY_MENTION, GOOGLE_FONT_FAMILY, GOOGLE_FONTS_HOST, captures,
    first_capture, scoped_declaration,
};
use crate::css::{StyleSheet, absolutize_urls};
use crate::parse::{Document, Matcher};

const GENERIC_FAMILIES: [&str; 6] = ["inherit", "initial", "unset", "serif", "sans-serif", "monospace"];

const PRIORITY_SELECTORS: [&str; 9] = ["body", "html", "h1", "h2", "h3", ".heading", ".title", ".text", "p"];

static PRIORITY_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    PRIORITY_SELECTORS
        .iter()
        .map(|selector| scoped_declaration(selector, "font-family"))
        .collect()
});

/// The `@font-face` block that defines a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontStyle {
    pub name: String,
    /// The raw block with `url(...)` references made absolute.
    pub css: String,
}

/// Font families used by the page.
///
/// Every `styles[].name` and every key of `urls` is also in `names`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontBundle {
    pub names: Vec<String>,
    pub styles: Vec<FontStyle>,
    pub urls: BTreeMap<String, Option<String>>,
}

/// Normalizes a raw `font-family` value to a single family name.
///
/// Quotes are stripped, only the first entry of a fallback list is kept and
/// generic keywords are rejected.
///
/// ```rust
/// use sitespec_core::fonts::normalize_family;
///
/// assert_eq!(normalize_family(r#""Open Sans", Arial, sans-serif"#), Some("Open Sans".to_string()));
/// assert_eq!(normalize_family("Sans-Serif"), None);
/// ```
pub fn normalize_family(raw: &str) -> Option<String> {
    let unquote = |s: &str| s.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string();

    let value = unquote(raw);
    let first = unquote(value.split(',').next().unwrap_or_default());

    if first.is_empty() || GENERIC_FAMILIES.iter().any(|g| g.eq_ignore_ascii_case(&first)) {
        return None;
    }
    Some(first)
}

#[derive(Debug)]
struct FontFace {
    css: String,
    url: Option<String>,
}

#[derive(Debug, Default)]
struct FontCollector {
    names: Vec<String>,
    faces: HashMap<String, FontFace>,
}

impl FontCollector {
    fn add(&mut self, raw: &str) -> Option<String> {
        let name = normalize_family(raw)?;
        if !self.names.contains(&name) {
            self.names.push(name.clone());
        }
        Some(name)
    }

    fn add_face(&mut self, name: String, css: String) {
        let url = font_source_url(&css);
        match self.faces.get_mut(&name) {
            Some(face) => {
                if face.url.is_none() {
                    face.url = url;
                }
            }
            None => {
                self.faces.insert(name, FontFace { css, url });
            }
        }
    }

    fn finish(mut self, max_fonts: usize) -> FontBundle {
        self.names.truncate(max_fonts);

        let styles = self
            .names
            .iter()
            .filter_map(|name| self.faces.get(name).map(|face| FontStyle { name: name.clone(), css: face.css.clone() }))
            .collect();
        let urls = self
            .names
            .iter()
            .map(|name| (name.clone(), self.faces.get(name).and_then(|face| face.url.clone())))
            .collect();

        FontBundle { names: self.names, styles, urls }
    }
}

/// First downloadable source in a `@font-face` block: an `http(s)` URL if
/// there is one, otherwise a `data:` URI.
fn font_source_url(block: &str) -> Option<String> {
    let urls: Vec<&str> = captures(&CSS_URL, block).collect();

    urls.iter()
        .find(|u| u.starts_with("http://") || u.starts_with("https://"))
        .or_else(|| urls.iter().find(|u| u.starts_with("data:")))
        .map(|u| u.to_string())
}

/// Splits a Google Fonts `family=` value into family names.
///
/// Handles both the v1 `Roboto|Open+Sans:400,700` form and a single v2
/// `Open+Sans:wght@400` family.
fn google_families(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split('|')
        .map(|family| family.replace('+', " "))
        .map(|family| family.split(':').next().unwrap_or_default().to_string())
}

/// Collects font families from links, stylesheets and inline styles.
///
/// Sources, in discovery order: Google-Fonts-style `<link>`s, `@font-face`
/// blocks, declarations scoped to common text selectors, inline `<style>`
/// blocks, and the first `style=` attributes mentioning `font-family`.
pub fn extract_fonts(doc: &Document, css: &StyleSheet, config: &AnalyzerConfig) -> FontBundle {
    let mut fonts = FontCollector::default();

    for link in doc.find_all("link", &Matcher::AttrMatches("href", &GOOGLE_FONTS_HOST)) {
        let Some(href) = link.attr("href") else {
            continue;
        };
        for value in captures(&GOOGLE_FONT_FAMILY, href) {
            for family in google_families(value) {
                fonts.add(&family);
            }
        }
    }

    for source in css.sources() {
        for block in FONT_FACE_BLOCK.find_iter(&source.content) {
            let Some(raw) = first_capture(&FONT_FAMILY_DECL, block.as_str()) else {
                continue;
            };
            if let Some(name) = fonts.add(raw) {
                fonts.add_face(name, absolutize_urls(block.as_str(), &source.base_url));
            }
        }
    }

    for rule in PRIORITY_RULES.iter() {
        for raw in captures(rule, css.text()) {
            fonts.add(raw);
        }
    }

    for style in doc.find_all("style", &Matcher::Any) {
        let content = style.text();
        for raw in captures(&FONT_FAMILY_DECL, &content) {
            fonts.add(raw);
        }
    }

    let styled = doc.find_any(&Matcher::AttrMatches("style", &FONT_FAMILY_MENTION));
    for element in styled.iter().take(config.max_style_attributes) {
        if let Some(raw) = element.attr("style").and_then(|style| first_capture(&FONT_FAMILY_DECL, style)) {
            fonts.add(raw);
        }
    }

    let bundle = fonts.finish(config.max_fonts);
    tracing::debug!(count = bundle.names.len(), "fonts extracted");
    bundle
}
