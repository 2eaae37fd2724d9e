//! Analysis output type and format conversion.
//!
//! This module defines [`AnalysisResult`], the complete design specification
//! derived from one page: identity, icons, splash screen, fonts, palette, UI
//! metrics and outbound links.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::color::ColorPalette;
use crate::fonts::FontBundle;
use crate::formatters::json::{JsonConfig, convert_to_json};
use crate::formatters::text::{TextConfig, convert_to_text};
use crate::icons::{IconSet, SplashScreen};
use crate::links::LinkRecord;
use crate::ui_specs::UiSpecs;

/// Output format options for an [`AnalysisResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Compact JSON.
    #[default]
    Json,
    /// Indented JSON.
    JsonPretty,
    /// Human-readable report.
    Text,
}

/// The complete result of analyzing one page.
///
/// Fields the heuristics could not determine are `None` (or empty); a
/// missing value does not distinguish "absent from the page" from "not
/// detected".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The URL that was requested, after scheme prefixing.
    pub url: String,

    /// Page title, `"Unknown name"` when none was found.
    pub title: String,

    /// Meta description, empty when none was found.
    pub description: String,

    pub icons: IconSet,

    pub splash_screen: SplashScreen,

    pub fonts: FontBundle,

    pub colors: ColorPalette,

    pub ui_specs: UiSpecs,

    /// Outbound links, internal ones first.
    pub links: Vec<LinkRecord>,
}

impl AnalysisResult {
    /// Converts the result to the specified format.
    pub fn to_format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => self.to_json(false),
            OutputFormat::JsonPretty => self.to_json(true),
            OutputFormat::Text => Ok(self.to_text()),
        }
    }

    /// Gets the result as a JSON document.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        convert_to_json(self, &JsonConfig { pretty })
    }

    /// Gets the result as a plain-text report.
    pub fn to_text(&self) -> String {
        convert_to_text(self, &TextConfig::default())
    }

    /// Number of links pointing at the analyzed site.
    pub fn internal_link_count(&self) -> usize {
        self.links.iter().filter(|link| link.is_internal).count()
    }

    /// Number of links pointing elsewhere.
    pub fn external_link_count(&self) -> usize {
        self.links.len() - self.internal_link_count()
    }
}
