use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };
    let completions_dir = out_dir.join("completions");

    if let Err(e) = fs::create_dir_all(&completions_dir) {
        println!("cargo:warning=Could not create completions directory: {}", e);
        return;
    }

    let mut cmd = clap::Command::new("sitespec")
        .version(env!("CARGO_PKG_VERSION"))
        .author("sitespec contributors")
        .about("Derive a design specification from a web page")
        .arg(clap::arg!(<INPUT> "URL to analyze, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (json, text)")
                .value_name("FORMAT")
                .default_value("json")
                .value_parser(["json", "text"]),
        )
        .arg(clap::arg!(--pretty "Indent JSON output"))
        .arg(clap::arg!(--"base-url" <URL> "URL that relative references in file/stdin input resolve against"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("10"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests"))
        .arg(clap::arg!(--"no-favicon-probe" "Do not probe /favicon.ico when the page declares no icon"))
        .arg(clap::arg!(-v --verbose "Show progress and debug logging on stderr"));

    let shells = [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ];
    for shell in shells {
        if let Err(e) = clap_complete::generate_to(shell, &mut cmd, "sitespec", &completions_dir) {
            println!("cargo:warning=Could not generate {} completions: {}", shell, e);
        }
    }
}
