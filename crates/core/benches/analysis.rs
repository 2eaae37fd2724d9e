use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sitespec_core::color::extract_colors;
use sitespec_core::ui_specs::extract_ui_specs;
use sitespec_core::{Analyzer, AnalyzerConfig, CssSource, Document, StyleSheet};
use url::Url;

const FIXTURE: &str = "../../tests/fixtures/landing.html";

fn base_url() -> Url {
    Url::parse("https://northwind.test/").unwrap()
}

fn inline_sheet(html: &str) -> StyleSheet {
    let doc = Document::parse(html, base_url());
    let sources = doc
        .select("style")
        .unwrap()
        .iter()
        .map(|style| CssSource::new(style.text(), base_url()))
        .collect();
    StyleSheet::new(sources)
}

fn bench_parse(c: &mut Criterion) {
    let html = std::fs::read_to_string(FIXTURE).unwrap();

    c.bench_function("parse", |b| b.iter(|| Document::parse(black_box(&html), base_url())));
}

fn bench_full_analysis(c: &mut Criterion) {
    let html = std::fs::read_to_string(FIXTURE).unwrap();
    let analyzer = Analyzer::with_config(AnalyzerConfig::builder().probe_favicon(false).build()).unwrap();

    c.bench_function("full_analysis", |b| {
        b.iter(|| analyzer.analyze_html(black_box(&html), "https://northwind.test/"))
    });
}

fn bench_css_heuristics(c: &mut Criterion) {
    let html = std::fs::read_to_string(FIXTURE).unwrap();
    let sheet = inline_sheet(&html);

    let mut group = c.benchmark_group("css");
    group.bench_function("colors", |b| b.iter(|| extract_colors(black_box(&sheet))));
    group.bench_function("ui_specs", |b| b.iter(|| extract_ui_specs(black_box(&sheet))));
    group.finish();
}

criterion_group!(benches, bench_parse, bench_full_analysis, bench_css_heuristics);
criterion_main!(benches);
