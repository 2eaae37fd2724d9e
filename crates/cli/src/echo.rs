use std::time::Duration;

use owo_colors::OwoColorize;
use sitespec_core::AnalysisResult;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "sitespec".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Derive a design specification from a web page\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a labelled detail line under a step
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 500.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 2000.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print a short summary of what the analysis found
pub fn print_summary(result: &AnalysisResult) {
    let found = |value: &Option<String>| value.as_deref().unwrap_or("none").to_string();

    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Analysis Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    print_detail("Title", &result.title);
    print_detail("Front icon", &found(&result.icons.front_icon));
    print_detail("Fonts", &result.fonts.names.len().to_string());
    print_detail("Primary color", &found(&result.colors.primary));
    print_detail(
        "Links",
        &format!(
            "{} internal, {} external",
            result.internal_link_count(),
            result.external_link_count()
        ),
    );
    eprintln!();
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
