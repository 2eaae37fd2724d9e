pub mod analysis;
pub mod analyze;
pub mod color;
pub mod css;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod fonts;
pub mod formatters;
pub mod icons;
pub mod links;
pub mod metadata;
pub mod parse;
pub mod ui_specs;

#[cfg(test)]
mod testing;

pub use analysis::{AnalysisResult, OutputFormat};
pub use analyze::{Analyzer, AnalyzerConfig, AnalyzerConfigBuilder, analyze, analyze_html, ensure_scheme};
pub use color::{ColorPalette, normalize_color};
pub use css::{CssSource, StyleSheet};
pub use error::{Result, SitespecError};
pub use fetch::{FetchConfig, FetchedPage, Fetcher, HttpFetcher, fetch_file, fetch_stdin};
pub use fonts::{FontBundle, FontStyle};
pub use formatters::{JsonConfig, TextConfig, convert_to_json, convert_to_text};
pub use icons::{IconSet, SplashScreen};
pub use links::LinkRecord;
pub use parse::{Document, Element, Matcher};
pub use ui_specs::{Border, Shadow, UiSpecs};
