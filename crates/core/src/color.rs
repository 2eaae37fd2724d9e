//! Color normalization and brand-palette detection.
//!
//! CSS has no "primary color" field, so the palette is recovered by a cascade
//! of guesses, each only filling slots the previous ones left empty:
//!
//! 1. custom properties such as `--primary-color`
//! 2. slot-named selectors (`.primary`, `.btn-primary`, `.primary-color`)
//! 3. common UI elements (`button`, `.btn`, anchors), primary only
//! 4. the most frequent non-black/white colors in the stylesheet

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::css::StyleSheet;
use crate::css::patterns::{
    COLOR_TOKEN, CUSTOM_PROPERTY, HEX_VALUE, RGB_FUNCTION, VAR_REFERENCE, captures, scoped_declaration,
};
use crate::fallback::Fallback;

/// How many ranked colors the frequency analysis returns.
const COMMON_COLOR_LIMIT: usize = 5;
/// How many raw color tokens the frequency analysis looks at.
const COLOR_TOKEN_SCAN_LIMIT: usize = 100;
/// Longest `var(--a)` → `var(--b)` chain followed when resolving custom properties.
const MAX_VAR_HOPS: usize = 5;

const NON_COLOR_WORDS: [&str; 8] =
    ["transparent", "inherit", "initial", "unset", "none", "auto", "currentcolor", "current-color"];

const BLACK_AND_WHITE: [&str; 4] = ["#000000", "#000", "#ffffff", "#fff"];

/// CSS named colors, sorted by name.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("aliceblue", "#f0f8ff"),
    ("antiquewhite", "#faebd7"),
    ("aqua", "#00ffff"),
    ("aquamarine", "#7fffd4"),
    ("azure", "#f0ffff"),
    ("beige", "#f5f5dc"),
    ("bisque", "#ffe4c4"),
    ("black", "#000000"),
    ("blanchedalmond", "#ffebcd"),
    ("blue", "#0000ff"),
    ("blueviolet", "#8a2be2"),
    ("brown", "#a52a2a"),
    ("burlywood", "#deb887"),
    ("cadetblue", "#5f9ea0"),
    ("chartreuse", "#7fff00"),
    ("chocolate", "#d2691e"),
    ("coral", "#ff7f50"),
    ("cornflowerblue", "#6495ed"),
    ("cornsilk", "#fff8dc"),
    ("crimson", "#dc143c"),
    ("cyan", "#00ffff"),
    ("darkblue", "#00008b"),
    ("darkcyan", "#008b8b"),
    ("darkgoldenrod", "#b8860b"),
    ("darkgray", "#a9a9a9"),
    ("darkgreen", "#006400"),
    ("darkgrey", "#a9a9a9"),
    ("darkkhaki", "#bdb76b"),
    ("darkmagenta", "#8b008b"),
    ("darkolivegreen", "#556b2f"),
    ("darkorange", "#ff8c00"),
    ("darkorchid", "#9932cc"),
    ("darkred", "#8b0000"),
    ("darksalmon", "#e9967a"),
    ("darkseagreen", "#8fbc8f"),
    ("darkslateblue", "#483d8b"),
    ("darkslategray", "#2f4f4f"),
    ("darkslategrey", "#2f4f4f"),
    ("darkturquoise", "#00ced1"),
    ("darkviolet", "#9400d3"),
    ("deeppink", "#ff1493"),
    ("deepskyblue", "#00bfff"),
    ("dimgray", "#696969"),
    ("dimgrey", "#696969"),
    ("dodgerblue", "#1e90ff"),
    ("firebrick", "#b22222"),
    ("floralwhite", "#fffaf0"),
    ("forestgreen", "#228b22"),
    ("fuchsia", "#ff00ff"),
    ("gainsboro", "#dcdcdc"),
    ("ghostwhite", "#f8f8ff"),
    ("gold", "#ffd700"),
    ("goldenrod", "#daa520"),
    ("gray", "#808080"),
    ("green", "#008000"),
    ("greenyellow", "#adff2f"),
    ("grey", "#808080"),
    ("honeydew", "#f0fff0"),
    ("hotpink", "#ff69b4"),
    ("indianred", "#cd5c5c"),
    ("indigo", "#4b0082"),
    ("ivory", "#fffff0"),
    ("khaki", "#f0e68c"),
    ("lavender", "#e6e6fa"),
    ("lavenderblush", "#fff0f5"),
    ("lawngreen", "#7cfc00"),
    ("lemonchiffon", "#fffacd"),
    ("lightblue", "#add8e6"),
    ("lightcoral", "#f08080"),
    ("lightcyan", "#e0ffff"),
    ("lightgoldenrodyellow", "#fafad2"),
    ("lightgray", "#d3d3d3"),
    ("lightgreen", "#90ee90"),
    ("lightgrey", "#d3d3d3"),
    ("lightpink", "#ffb6c1"),
    ("lightsalmon", "#ffa07a"),
    ("lightseagreen", "#20b2aa"),
    ("lightskyblue", "#87cefa"),
    ("lightslategray", "#778899"),
    ("lightslategrey", "#778899"),
    ("lightsteelblue", "#b0c4de"),
    ("lightyellow", "#ffffe0"),
    ("lime", "#00ff00"),
    ("limegreen", "#32cd32"),
    ("linen", "#faf0e6"),
    ("magenta", "#ff00ff"),
    ("maroon", "#800000"),
    ("mediumaquamarine", "#66cdaa"),
    ("mediumblue", "#0000cd"),
    ("mediumorchid", "#ba55d3"),
    ("mediumpurple", "#9370db"),
    ("mediumseagreen", "#3cb371"),
    ("mediumslateblue", "#7b68ee"),
    ("mediumspringgreen", "#00fa9a"),
    ("mediumturquoise", "#48d1cc"),
    ("mediumvioletred", "#c71585"),
    ("midnightblue", "#191970"),
    ("mintcream", "#f5fffa"),
    ("mistyrose", "#ffe4e1"),
    ("moccasin", "#ffe4b5"),
    ("navajowhite", "#ffdead"),
    ("navy", "#000080"),
    ("oldlace", "#fdf5e6"),
    ("olive", "#808000"),
    ("olivedrab", "#6b8e23"),
    ("orange", "#ffa500"),
    ("orangered", "#ff4500"),
    ("orchid", "#da70d6"),
    ("palegoldenrod", "#eee8aa"),
    ("palegreen", "#98fb98"),
    ("paleturquoise", "#afeeee"),
    ("palevioletred", "#db7093"),
    ("papayawhip", "#ffefd5"),
    ("peachpuff", "#ffdab9"),
    ("peru", "#cd853f"),
    ("pink", "#ffc0cb"),
    ("plum", "#dda0dd"),
    ("powderblue", "#b0e0e6"),
    ("purple", "#800080"),
    ("rebeccapurple", "#663399"),
    ("red", "#ff0000"),
    ("rosybrown", "#bc8f8f"),
    ("royalblue", "#4169e1"),
    ("saddlebrown", "#8b4513"),
    ("salmon", "#fa8072"),
    ("sandybrown", "#f4a460"),
    ("seagreen", "#2e8b57"),
    ("seashell", "#fff5ee"),
    ("sienna", "#a0522d"),
    ("silver", "#c0c0c0"),
    ("skyblue", "#87ceeb"),
    ("slateblue", "#6a5acd"),
    ("slategray", "#708090"),
    ("slategrey", "#708090"),
    ("snow", "#fffafa"),
    ("springgreen", "#00ff7f"),
    ("steelblue", "#4682b4"),
    ("tan", "#d2b48c"),
    ("teal", "#008080"),
    ("thistle", "#d8bfd8"),
    ("tomato", "#ff6347"),
    ("turquoise", "#40e0d0"),
    ("violet", "#ee82ee"),
    ("wheat", "#f5deb3"),
    ("white", "#ffffff"),
    ("whitesmoke", "#f5f5f5"),
    ("yellow", "#ffff00"),
    ("yellowgreen", "#9acd32"),
];

/// Looks up a CSS color keyword, ignoring ASCII case.
pub fn named_color(name: &str) -> Option<&'static str> {
    let name = name.trim().to_ascii_lowercase();
    NAMED_COLORS
        .binary_search_by_key(&name.as_str(), |(n, _)| n)
        .ok()
        .map(|i| NAMED_COLORS[i].1)
}

pub fn is_named_color(token: &str) -> bool {
    named_color(token).is_some()
}

/// Normalizes a CSS color value to a `#`-prefixed hex string.
///
/// - `#1A2b3C` / `1a2b3c` → `#1a2b3c` (3-digit forms stay 3 digits)
/// - `rgb(255, 0, 10)` / `rgba(...)` → `#ff000a`
/// - `Tomato` → `#ff6347`
///
/// Anything else is returned trimmed and otherwise unchanged, so callers must
/// check for the `#` prefix (see [`to_hex`]) before trusting the result.
///
/// ```rust
/// use sitespec_core::color::normalize_color;
///
/// assert_eq!(normalize_color(" #1A2b3C "), "#1a2b3c");
/// assert_eq!(normalize_color("fff"), "#fff");
/// assert_eq!(normalize_color("rgba(0, 128, 255, .4)"), "#0080ff");
/// assert_eq!(normalize_color("navy"), "#000080");
/// assert_eq!(normalize_color("var(--brand)"), "var(--brand)");
/// ```
pub fn normalize_color(value: &str) -> String {
    let value = value.trim().trim_matches(|c| c == '"' || c == '\'').trim();

    if HEX_VALUE.is_match(value) {
        return format!("#{}", value.trim_start_matches('#').to_ascii_lowercase());
    }

    if let Some(caps) = RGB_FUNCTION.captures(value) {
        let channel = |i: usize| caps[i].parse::<u64>().map(|v| v.min(255)).unwrap_or(255);
        return format!("#{:02x}{:02x}{:02x}", channel(1), channel(2), channel(3));
    }

    if let Some(hex) = named_color(value) {
        return hex.to_string();
    }

    value.to_string()
}

/// Whether a normalized value is a hex color.
pub fn is_hex_color(value: &str) -> bool {
    value.starts_with('#')
}

/// Normalizes `value` and keeps it only if the result is hex.
pub fn to_hex(value: &str) -> Option<String> {
    Some(normalize_color(value)).filter(|c| is_hex_color(c))
}

fn is_black_or_white(hex: &str) -> bool {
    BLACK_AND_WHITE.contains(&hex)
}

/// Primary, secondary and tertiary brand colors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub tertiary: Option<String>,
}

impl ColorPalette {
    pub fn is_complete(&self) -> bool {
        self.primary.is_some() && self.secondary.is_some() && self.tertiary.is_some()
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::Primary => &mut self.primary,
            Slot::Secondary => &mut self.secondary,
            Slot::Tertiary => &mut self.tertiary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Primary,
    Secondary,
    Tertiary,
}

impl Slot {
    const ALL: [Slot; 3] = [Slot::Primary, Slot::Secondary, Slot::Tertiary];

    fn keyword(self) -> &'static str {
        match self {
            Slot::Primary => "primary",
            Slot::Secondary => "secondary",
            Slot::Tertiary => "tertiary",
        }
    }

    fn rules(self) -> &'static [Regex] {
        match self {
            Slot::Primary => &PRIMARY_RULES,
            Slot::Secondary => &SECONDARY_RULES,
            Slot::Tertiary => &TERTIARY_RULES,
        }
    }
}

const BACKGROUND_PROPERTY: &str = "background(?:-color)?";

fn slot_rules(slot: &str, with_color_class: bool) -> Vec<Regex> {
    let mut rules = vec![
        scoped_declaration(&format!(".{slot}"), "color"),
        scoped_declaration(&format!(".btn-{slot}"), BACKGROUND_PROPERTY),
    ];
    if with_color_class {
        rules.push(scoped_declaration(&format!(".{slot}-color"), "color"));
    }
    rules
}

static PRIMARY_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| slot_rules("primary", true));
static SECONDARY_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| slot_rules("secondary", true));
static TERTIARY_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| slot_rules("tertiary", false));

/// Generic interactive elements that usually carry the brand color.
static UI_ELEMENT_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        scoped_declaration("button", BACKGROUND_PROPERTY),
        scoped_declaration(".btn", BACKGROUND_PROPERTY),
        scoped_declaration("a", "color"),
    ]
});

/// Detects the brand palette from the aggregated CSS.
pub fn extract_colors(css: &StyleSheet) -> ColorPalette {
    let text = css.text();
    let vars = custom_properties(text);
    let mut palette = ColorPalette::default();

    for slot in Slot::ALL {
        let found = Fallback::new()
            .or_try(|| from_custom_properties(&vars, slot.keyword()))
            .or_try(|| first_hex(slot.rules(), text, |_| true))
            .or_try(|| match slot {
                Slot::Primary => first_hex(&UI_ELEMENT_RULES, text, |hex| !is_black_or_white(hex)),
                _ => None,
            })
            .finish();
        *palette.slot_mut(slot) = found;
    }

    if !palette.is_complete() {
        let common = common_colors(text);
        for (slot, color) in Slot::ALL.into_iter().zip(common) {
            let current = palette.slot_mut(slot);
            if current.is_none() {
                *current = Some(color);
            }
        }
    }

    palette
}

/// Custom properties in first-declaration order. A re-declaration keeps the
/// original position and takes the newer value. Names are lowercased.
pub fn custom_properties(css: &str) -> Vec<(String, String)> {
    let mut vars: Vec<(String, String)> = Vec::new();

    for caps in CUSTOM_PROPERTY.captures_iter(css) {
        let name = caps[1].trim().to_lowercase();
        let value = caps[2].trim().trim_matches(|c| c == '"' || c == '\'').to_string();

        match vars.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => vars.push((name, value)),
        }
    }

    vars
}

/// Follows `var(--x)` references through `vars`, honoring fallbacks.
pub fn resolve_var(value: &str, vars: &[(String, String)]) -> Option<String> {
    let mut current = value.trim().to_string();

    for _ in 0..MAX_VAR_HOPS {
        let Some(caps) = VAR_REFERENCE.captures(&current) else {
            return Some(current);
        };
        let name = caps[1].to_lowercase();
        let next = vars
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.clone())
            .or_else(|| caps.get(2).map(|m| m.as_str().trim().to_string()))?;
        current = next;
    }

    None
}

fn from_custom_properties(vars: &[(String, String)], keyword: &str) -> Option<String> {
    vars.iter()
        .filter(|(name, _)| {
            name.contains(keyword) && (name.contains("color") || name.contains("main") || name == keyword)
        })
        .find_map(|(_, value)| resolve_var(value, vars).and_then(|v| to_hex(&v)))
}

fn first_hex(rules: &[Regex], css: &str, accept: impl Fn(&str) -> bool) -> Option<String> {
    rules
        .iter()
        .flat_map(|rule| captures(rule, css))
        .filter_map(to_hex)
        .find(|hex| accept(hex))
}

/// The most frequent hex colors in `css`, black and white excluded, most
/// frequent first; ties keep first-seen order. Only `#`-hex, `rgb()` and
/// named colors count; bare hex-letter words such as `fade` do not.
pub fn common_colors(css: &str) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    let tokens = COLOR_TOKEN
        .find_iter(css)
        .map(|m| m.as_str())
        .filter(|token| !NON_COLOR_WORDS.contains(&token.to_ascii_lowercase().as_str()))
        .take(COLOR_TOKEN_SCAN_LIMIT);

    for token in tokens {
        let is_candidate =
            token.starts_with('#') || token.to_ascii_lowercase().starts_with("rgb") || is_named_color(token);
        if !is_candidate {
            continue;
        }
        let Some(hex) = to_hex(token) else {
            continue;
        };
        if is_black_or_white(&hex) {
            continue;
        }

        match counts.iter_mut().find(|(c, _)| *c == hex) {
            Some(entry) => entry.1 += 1,
            None => counts.push((hex, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(COMMON_COLOR_LIMIT).map(|(color, _)| color).collect()
}
