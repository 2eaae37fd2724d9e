//! Shadow, border, radius and spacing metrics.
//!
//! Every value comes from the first matching declaration anywhere in the
//! aggregated CSS, with no selector scoping.

use serde::{Deserialize, Serialize};

use crate::color::{is_named_color, to_hex};
use crate::css::StyleSheet;
use crate::css::patterns::{BORDER, BORDER_COLOR, BORDER_RADIUS, BOX_SHADOW, GAP, MARGIN, first_capture};

/// Fewest tokens a `box-shadow` layer needs before it is parsed.
const MIN_SHADOW_TOKENS: usize = 4;

const LENGTH_UNITS: [&str; 4] = ["rem", "px", "em", "pt"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Option<String>,
    pub opacity: Option<String>,
    /// Direction of the offset, e.g. `63.4°`.
    pub angle: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub color: Option<String>,
    pub thickness: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiSpecs {
    pub shadow: Shadow,
    pub border: Border,
    pub corner_radius: Option<String>,
    pub item_spacing: Option<String>,
}

/// Splits `value` at every `separator` that is not inside parentheses.
/// Empty pieces are dropped.
fn split_top_level(value: &str, separator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 && separator(c) => {
                pieces.push(&value[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push(&value[start..]);

    pieces.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect()
}

/// Whitespace-separated tokens, keeping `rgba(0, 0, 0, .2)` in one piece.
///
/// ```rust
/// use sitespec_core::ui_specs::tokenize;
///
/// assert_eq!(tokenize("0 1px 3px rgba(0, 0, 0, .2)"), vec!["0", "1px", "3px", "rgba(0, 0, 0, .2)"]);
/// ```
pub fn tokenize(value: &str) -> Vec<&str> {
    split_top_level(value, char::is_whitespace)
}

fn looks_like_color(token: &str) -> bool {
    token.contains('#') || token.to_ascii_lowercase().contains("rgb") || is_named_color(token)
}

/// Alpha argument of an `rgba()`/`hsla()` (or slash-syntax) color token.
fn alpha_channel(token: &str) -> Option<String> {
    let lower = token.to_ascii_lowercase();
    if !(lower.starts_with("rgb") || lower.starts_with("hsl")) {
        return None;
    }
    let inner = token.split_once('(')?.1.trim_end_matches(')');

    let alpha = match inner.split_once('/') {
        Some((_, alpha)) => alpha,
        None => inner.split(',').nth(3)?,
    };
    Some(alpha.trim().to_string()).filter(|a| !a.is_empty())
}

fn parse_length(token: &str) -> Option<f64> {
    let number = LENGTH_UNITS
        .iter()
        .find_map(|unit| token.strip_suffix(unit))
        .unwrap_or(token);
    number.parse().ok()
}

/// Parses the first layer of a `box-shadow` value.
pub fn parse_shadow(value: &str) -> Shadow {
    let mut shadow = Shadow::default();
    let Some(layer) = split_top_level(value, |c| c == ',').into_iter().next() else {
        return shadow;
    };
    let tokens = tokenize(layer);
    if tokens.len() < MIN_SHADOW_TOKENS {
        return shadow;
    }

    if let Some(color) = tokens.iter().rev().find(|t| looks_like_color(t)) {
        shadow.color = to_hex(color);
        shadow.opacity = alpha_channel(color);
    }

    let offsets: Vec<&str> = tokens
        .iter()
        .copied()
        .skip_while(|t| t.eq_ignore_ascii_case("inset"))
        .take(2)
        .collect();
    if let [x, y] = offsets.as_slice()
        && let (Some(x), Some(y)) = (parse_length(x), parse_length(y))
    {
        shadow.angle = Some(format!("{:.1}°", y.atan2(x).to_degrees()));
    }

    shadow
}

fn is_thickness(token: &str) -> bool {
    let digits = token.replace('.', "").replace("px", "");
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Parses a `border` shorthand. Later qualifying tokens overwrite earlier ones.
pub fn parse_border(value: &str) -> Border {
    let mut border = Border::default();

    for token in tokenize(value) {
        if is_thickness(token) {
            border.thickness = Some(token.to_string());
        } else if looks_like_color(token)
            && let Some(hex) = to_hex(token)
        {
            border.color = Some(hex);
        }
    }

    border
}

pub fn extract_ui_specs(css: &StyleSheet) -> UiSpecs {
    let text = css.text();

    let shadow = first_capture(&BOX_SHADOW, text).map(parse_shadow).unwrap_or_default();

    let mut border = first_capture(&BORDER, text).map(parse_border).unwrap_or_default();
    if border.color.is_none() {
        border.color = first_capture(&BORDER_COLOR, text).and_then(to_hex);
    }

    UiSpecs {
        shadow,
        border,
        corner_radius: first_capture(&BORDER_RADIUS, text).map(str::to_string),
        item_spacing: first_capture(&GAP, text)
            .or_else(|| first_capture(&MARGIN, text))
            .map(str::to_string),
    }
}
