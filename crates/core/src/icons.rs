//! Icon, background color and splash screen extraction.

use std::cmp::Reverse;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analyze::AnalyzerConfig;
use crate::color::to_hex;
use crate::css::StyleSheet;
use crate::css::patterns::{BACKGROUND_DECL, DIMENSIONS, ROOT_BACKGROUND, captures, first_capture, scoped_declaration};
use crate::fallback::Fallback;
use crate::fetch::Fetcher;
use crate::parse::{Document, Element, Matcher};

/// Background declarations inspected for a `default` status bar style.
const STATUS_BAR_SCAN_LIMIT: usize = 5;

const MAIN_CONTAINER_SELECTORS: [&str; 7] = ["body", "html", "#app", "#root", ".app", ".main", ".container"];

static MAIN_CONTAINER_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    MAIN_CONTAINER_SELECTORS
        .iter()
        .map(|selector| scoped_declaration(selector, "background(?:-color)?"))
        .collect()
});

/// Home-screen icons and the color behind them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSet {
    pub front_icon: Option<String>,
    pub background_icon: Option<String>,
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplashScreen {
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IconKind {
    AppleTouch,
    Generic,
    /// A `shortcut` rel without an `icon` token.
    Unclassified,
}

#[derive(Debug)]
struct IconCandidate {
    priority: u8,
    url: String,
    kind: IconKind,
}

fn is_icon_link(link: &Element<'_>) -> bool {
    link.rel_contains("icon") || link.rel_contains("shortcut")
}

/// `WIDTHxHEIGHT` area parsed from an attribute, if any.
fn parsed_area(value: &str) -> Option<u64> {
    let caps = DIMENSIONS.captures(value)?;
    let width: u64 = caps[1].parse().ok()?;
    let height: u64 = caps[2].parse().ok()?;
    Some(width.saturating_mul(height))
}

/// Extracts the front/background icons and the icon background color.
///
/// Apple touch icons rank above icons with explicit `sizes`, which rank above
/// plain icons. When no `<link>` yields an icon, `/favicon.ico` is probed
/// with a HEAD request (unless disabled in `config`).
pub fn extract_icons(doc: &Document, css: &StyleSheet, fetcher: &dyn Fetcher, config: &AnalyzerConfig) -> IconSet {
    let mut candidates: Vec<IconCandidate> = doc
        .find_all("link", &Matcher::HasAttr("href"))
        .into_iter()
        .filter(is_icon_link)
        .filter_map(|link| {
            let url = doc.resolve(link.non_empty_attr("href")?)?;
            let kind = if link.rel_contains("apple-touch-icon") {
                IconKind::AppleTouch
            } else if link.rel_contains("icon") {
                IconKind::Generic
            } else {
                IconKind::Unclassified
            };
            let sized = link.non_empty_attr("sizes").is_some_and(|s| s != "any");
            let priority = match kind {
                IconKind::AppleTouch => 3,
                _ if sized => 2,
                _ => 1,
            };
            Some(IconCandidate { priority, url: url.to_string(), kind })
        })
        .collect();
    candidates.sort_by_key(|c| Reverse(c.priority));

    let mut icons = IconSet::default();
    for candidate in candidates {
        match candidate.kind {
            IconKind::AppleTouch => {
                icons.front_icon.get_or_insert(candidate.url);
            }
            IconKind::Generic => {
                icons.front_icon.get_or_insert_with(|| candidate.url.clone());
                icons.background_icon.get_or_insert(candidate.url);
            }
            IconKind::Unclassified => {}
        }
    }

    if icons.front_icon.is_none()
        && config.probe_favicon
        && let Some(favicon) = doc.resolve("/favicon.ico")
    {
        if fetcher.probe(&favicon) {
            icons.front_icon = Some(favicon.to_string());
            icons.background_icon = Some(favicon.to_string());
        } else {
            tracing::debug!(url = %favicon, "favicon probe failed");
        }
    }

    icons.background_color = Fallback::new()
        .or_try(|| doc.meta_content("name", "theme-color").and_then(|c| to_hex(&c)))
        .or_try(|| doc.meta_content("name", "msapplication-TileColor").and_then(|c| to_hex(&c)))
        .or_try(|| captures(&ROOT_BACKGROUND, css.text()).find_map(to_hex))
        .or_try(|| {
            doc.find_first("body", &Matcher::HasAttr("style"))
                .and_then(|body| body.attr("style"))
                .and_then(|style| first_capture(&BACKGROUND_DECL, style))
                .and_then(to_hex)
        })
        .finish();

    icons
}

/// Extracts the splash screen image and color.
pub fn extract_splash_screen(doc: &Document, css: &StyleSheet) -> SplashScreen {
    let icon = Fallback::new()
        .or_try(|| largest_startup_image(doc))
        .or_try(|| largest_touch_icon(doc))
        .finish();

    let color = Fallback::new()
        .or_try(|| doc.meta_content("name", "theme-color").and_then(|c| to_hex(&c)))
        .or_try(|| status_bar_color(doc, css))
        .or_try(|| {
            MAIN_CONTAINER_RULES
                .iter()
                .filter_map(|rule| first_capture(rule, css.text()))
                .find_map(to_hex)
        })
        .finish();

    SplashScreen { icon, color }
}

/// The `apple-touch-startup-image` with the largest `media` resolution.
/// Images without a parsable resolution count as area 0; ties keep the first.
fn largest_startup_image(doc: &Document) -> Option<String> {
    let mut best: Option<(u64, String)> = None;

    for link in doc.find_all("link", &Matcher::RelContains("apple-touch-startup-image")) {
        let Some(url) = link.non_empty_attr("href").and_then(|href| doc.resolve(href)) else {
            continue;
        };
        let area = link.attr("media").and_then(parsed_area).unwrap_or(0);
        if best.as_ref().is_none_or(|(largest, _)| area > *largest) {
            best = Some((area, url.to_string()));
        }
    }

    best.map(|(_, url)| url)
}

/// The `apple-touch-icon` with the largest `sizes`; an unsized icon is used
/// only if it comes before every sized one.
fn largest_touch_icon(doc: &Document) -> Option<String> {
    let mut largest: Option<String> = None;
    let mut largest_area = 0;

    for link in doc.find_all("link", &Matcher::RelContains("apple-touch-icon")) {
        let Some(url) = link.non_empty_attr("href").and_then(|href| doc.resolve(href)) else {
            continue;
        };
        match link.attr("sizes").and_then(parsed_area) {
            Some(area) if area > largest_area => {
                largest_area = area;
                largest = Some(url.to_string());
            }
            Some(_) => {}
            None if largest.is_none() => largest = Some(url.to_string()),
            None => {}
        }
    }

    largest
}

fn status_bar_color(doc: &Document, css: &StyleSheet) -> Option<String> {
    let style = doc.meta_content("name", "apple-mobile-web-app-status-bar-style")?.to_lowercase();

    if style.contains("black") {
        Some("#000000".to_string())
    } else if style.contains("default") {
        captures(&BACKGROUND_DECL, css.text())
            .take(STATUS_BAR_SCAN_LIMIT)
            .find_map(to_hex)
    } else {
        None
    }
}
