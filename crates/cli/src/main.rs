use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use sitespec_core::{Analyzer, AnalyzerConfig, OutputFormat, ensure_scheme, fetch_file, fetch_stdin};
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL for file and stdin input when `--base-url` is not given
const DEFAULT_BASE_URL: &str = "http://localhost/";

/// Output format for the analysis result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Text,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: json, text", s)),
        }
    }
}

/// Derive a design specification (icons, fonts, colors, UI metrics, links) from a web page
#[derive(Parser, Debug)]
#[command(name = "sitespec")]
#[command(author = "sitespec contributors")]
#[command(version = VERSION)]
#[command(about = "Derive a design specification from a web page", long_about = None)]
struct Args {
    /// URL to analyze, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: Format,

    /// Indent JSON output
    #[arg(long)]
    pretty: bool,

    /// URL that relative references in file/stdin input resolve against
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "10", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Do not probe /favicon.ico when the page declares no icon
    #[arg(long)]
    no_favicon_probe: bool,

    /// Show progress and debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn output_format(&self) -> OutputFormat {
        match (self.format, self.pretty) {
            (Format::Text, _) => OutputFormat::Text,
            (Format::Json, true) => OutputFormat::JsonPretty,
            (Format::Json, false) => OutputFormat::Json,
        }
    }

    fn analyzer_config(&self) -> AnalyzerConfig {
        let mut builder = AnalyzerConfig::builder()
            .timeout(self.timeout)
            .probe_favicon(!self.no_favicon_probe);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        builder.build()
    }
}

/// Where the HTML comes from
enum Input<'a> {
    Stdin,
    File(&'a Path),
    Url(String),
}

impl<'a> Input<'a> {
    fn classify(raw: &'a str) -> Self {
        let path = Path::new(raw);
        if raw == "-" {
            Self::Stdin
        } else if path.is_file() {
            Self::File(path)
        } else {
            Self::Url(ensure_scheme(raw))
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("sitespec_core=debug"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.verbose {
        echo::print_banner();
        init_logging();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let analyzer = Analyzer::with_config(args.analyzer_config()).context("Failed to build HTTP client")?;
    let started = Instant::now();

    let result = match Input::classify(&args.input) {
        Input::Url(url) => {
            if args.verbose {
                echo::print_step(1, 2, &format!("Analyzing {}", url.bright_white().underline()));
            }
            analyzer
                .analyze(&url)
                .with_context(|| format!("Failed to analyze {}", url))?
        }
        input => {
            let html = match input {
                Input::File(path) => {
                    if args.verbose {
                        echo::print_step(1, 2, &format!("Reading from file {}", path.display().bright_white()));
                    }
                    fetch_file(path).with_context(|| format!("Failed to read file: {}", path.display()))?
                }
                _ => {
                    if args.verbose {
                        echo::print_step(1, 2, "Reading from stdin");
                    }
                    fetch_stdin().context("Failed to read from stdin")?
                }
            };

            let base_url = args.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
            if args.verbose {
                echo::print_detail("Size", &echo::format_size(html.len()));
                echo::print_detail("Base URL", base_url);
            }
            analyzer
                .analyze_html(&html, base_url)
                .with_context(|| format!("Failed to analyze input as {}", base_url))?
        }
    };

    if args.verbose {
        echo::print_timing("Analysis", started.elapsed());
        echo::print_summary(&result);
        echo::print_step(2, 2, "Writing output");
        echo::print_detail("Format", &format!("{:?}", args.output_format()));
        eprintln!();
    }

    let output = result.to_format(args.output_format()).context("Failed to format result")?;

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
