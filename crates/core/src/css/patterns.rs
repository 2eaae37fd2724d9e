//! Named regular expressions behind every CSS heuristic.
//!
//! The "parser" here is a set of regexes over raw stylesheet
//! text: no cascade, specificity or media queries. Declaration values stop at
//! `;` or `}`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

// Patterns are literals; every one is exercised by the tests below.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// `@import url("x.css") screen;` / `@import 'x.css';`. The target sits in
/// whichever group matched; read it with [`import_target`].
pub static IMPORT_RULE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r#"(?i)@import\s+(?:url\(\s*(?:"([^"]*)"|'([^']*)'|([^"')\s]+))\s*\)|"([^"]*)"|'([^']*)')[^;]*;"#,
    )
});

/// Target of an [`IMPORT_RULE`] match, trimmed. Quoted targets may contain `;`.
pub fn import_target<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str().trim())
        .filter(|target| !target.is_empty())
}

/// `url(...)` reference. Group 1 is the unquoted target.
pub static CSS_URL: LazyLock<Regex> = LazyLock::new(|| compile(r#"(?i)url\(\s*["']?([^"')]+?)["']?\s*\)"#));

/// A whole `@font-face { ... }` block.
pub static FONT_FACE_BLOCK: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)@font-face\s*\{[^}]*\}"));

/// `font-family: value`. Group 1 is the value up to the first quote or `;`.
pub static FONT_FAMILY_DECL: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)font-family:\s*["']?([^;"'}]+)["']?"#));

/// Hosts serving Google-Fonts-style stylesheets.
pub static GOOGLE_FONTS_HOST: LazyLock<Regex> =
    LazyLock::new(|| compile(r"fonts\.googleapis\.com|fonts\.gstatic\.com"));

/// `family=` query parameter. Group 1 is the raw (plus-encoded) family list.
pub static GOOGLE_FONT_FAMILY: LazyLock<Regex> = LazyLock::new(|| compile(r"family=([^&]+)"));

/// `--name: value` custom property. Groups: name, value.
pub static CUSTOM_PROPERTY: LazyLock<Regex> = LazyLock::new(|| compile(r"--([\w-]+)\s*:\s*([^;}]+)"));

/// `var(--name)` or `var(--name, fallback)`. Groups: name, optional fallback.
pub static VAR_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^var\(\s*--([\w-]+)\s*(?:,\s*([^)]+?))?\s*\)$"));

/// `background: value` or `background-color: value`.
pub static BACKGROUND_DECL: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)background(?:-color)?:\s*([^;}]+)"));

/// Background declared in a rule whose selector mentions `body` or `html`.
pub static ROOT_BACKGROUND: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(?:body|html)[^{]*\{[^}]*background(?:-color)?:\s*([^;}]+)"));

pub static BOX_SHADOW: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)box-shadow:\s*([^;}]+)"));

pub static BORDER: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)border(?:-width)?:\s*([^;}]+)"));

pub static BORDER_COLOR: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)border-color:\s*([^;}]+)"));

pub static BORDER_RADIUS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)border-radius:\s*([^;}]+)"));

pub static GAP: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)gap:\s*([^;}]+)"));

pub static MARGIN: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)margin:\s*([^;}]+)"));

/// Anything that could be a color: hex, rgb(a), hsl(a) or a bare word.
pub static COLOR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"#(?:[0-9a-fA-F]{3}){1,2}|rgb\([^)]+\)|rgba\([^)]+\)|hsl\([^)]+\)|hsla\([^)]+\)|[a-zA-Z]+")
});

/// 3 to 6 hex digits with an optional `#`.
pub static HEX_VALUE: LazyLock<Regex> = LazyLock::new(|| compile(r"^#?[0-9A-Fa-f]{3,6}$"));

/// Leading `rgb(r, g, b` / `rgba(r, g, b`. Groups: channels.
pub static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^rgba?\((\d+),\s*(\d+),\s*(\d+)"));

/// `WIDTHxHEIGHT` inside a `sizes` or `media` attribute.
pub static DIMENSIONS: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d+)x(\d+)"));

/// Case-insensitive `font-family` mention inside a `style=` attribute.
pub static FONT_FAMILY_MENTION: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)font-family"));

/// Builds `selector … { … property: (value)` scoped to the first rule after
/// a selector mention. `property` is itself a regex fragment.
pub fn scoped_declaration(selector: &str, property: &str) -> Regex {
    compile(&format!(r"(?i){}[^{{]*\{{[^}}]*{}:\s*([^;}}]+)", regex::escape(selector), property))
}

/// Iterates group 1 of every match, trimmed.
pub fn captures<'t>(re: &Regex, text: &'t str) -> impl Iterator<Item = &'t str> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Group 1 of the first match, trimmed.
pub fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    captures(re, text).next()
}
