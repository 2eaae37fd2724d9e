use std::fmt::Write;

use crate::analysis::AnalysisResult;

const MISSING: &str = "-";

/// Configuration for plain text output
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// List individual links, not just the counts
    pub include_links: bool,

    /// Maximum number of links listed (0 = all)
    pub max_links: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { include_links: true, max_links: 0 }
    }
}

fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}

fn heading(output: &mut String, title: &str) {
    let _ = writeln!(output, "\n{}\n{}", title, "-".repeat(title.chars().count()));
}

fn field(output: &mut String, label: &str, value: &str) {
    let _ = writeln!(output, "  {:<18}{}", format!("{}:", label), value);
}

/// Render an analysis result as a human-readable report
pub fn convert_to_text(result: &AnalysisResult, config: &TextConfig) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{}\n{}", result.title, "=".repeat(result.title.chars().count()));
    let _ = writeln!(output, "{}", result.url);
    if !result.description.is_empty() {
        let _ = writeln!(output, "\n{}", result.description);
    }

    heading(&mut output, "Icons");
    field(&mut output, "front", or_missing(&result.icons.front_icon));
    field(&mut output, "background", or_missing(&result.icons.background_icon));
    field(&mut output, "background color", or_missing(&result.icons.background_color));

    heading(&mut output, "Splash screen");
    field(&mut output, "icon", or_missing(&result.splash_screen.icon));
    field(&mut output, "color", or_missing(&result.splash_screen.color));

    heading(&mut output, "Fonts");
    if result.fonts.names.is_empty() {
        let _ = writeln!(output, "  {}", MISSING);
    }
    for name in &result.fonts.names {
        match result.fonts.urls.get(name).and_then(Option::as_deref) {
            Some(url) => {
                let _ = writeln!(output, "  {} ({})", name, url);
            }
            None => {
                let _ = writeln!(output, "  {}", name);
            }
        }
    }

    heading(&mut output, "Colors");
    field(&mut output, "primary", or_missing(&result.colors.primary));
    field(&mut output, "secondary", or_missing(&result.colors.secondary));
    field(&mut output, "tertiary", or_missing(&result.colors.tertiary));

    let ui = &result.ui_specs;
    heading(&mut output, "UI");
    field(
        &mut output,
        "shadow",
        &format!(
            "color {}, opacity {}, angle {}",
            or_missing(&ui.shadow.color),
            or_missing(&ui.shadow.opacity),
            or_missing(&ui.shadow.angle)
        ),
    );
    field(
        &mut output,
        "border",
        &format!("{} {}", or_missing(&ui.border.thickness), or_missing(&ui.border.color)),
    );
    field(&mut output, "corner radius", or_missing(&ui.corner_radius));
    field(&mut output, "item spacing", or_missing(&ui.item_spacing));

    heading(
        &mut output,
        &format!(
            "Links ({} internal, {} external)",
            result.internal_link_count(),
            result.external_link_count()
        ),
    );
    if config.include_links {
        let limit = if config.max_links == 0 { usize::MAX } else { config.max_links };
        for link in result.links.iter().take(limit) {
            let scope = if link.is_internal { "int" } else { "ext" };
            let _ = writeln!(output, "  [{}] {} -> {}", scope, link.text, link.url);
        }
        if result.links.len() > limit {
            let _ = writeln!(output, "  ... {} more", result.links.len() - limit);
        }
    }

    output.trim_end().to_string()
}
