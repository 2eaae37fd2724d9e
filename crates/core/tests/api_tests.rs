//! Library API integration tests against a local HTTP server
use std::time::Duration;

use httpmock::Method::HEAD;
use httpmock::prelude::*;
use sitespec_core::*;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn analyzer(probe_favicon: bool) -> Analyzer {
    let config = AnalyzerConfig::builder().timeout(5).probe_favicon(probe_favicon).build();
    Analyzer::with_config(config).unwrap()
}

#[test]
fn test_redirect_changes_base_for_relative_assets() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(301).header("Location", server.url("/app/"));
    });
    server.mock(|when, then| {
        when.method(GET).path("/app/");
        then.status(200)
            .header("content-type", "text/html")
            .body(r#"<title>Moved</title><link rel="icon" href="icon.png"><a href="docs">Docs</a>"#);
    });

    let result = analyzer(false).analyze(&server.url("/")).unwrap();

    assert_eq!(result.url, server.url("/"));
    assert_eq!(result.title, "Moved");
    assert_eq!(result.icons.front_icon, Some(server.url("/app/icon.png")));
    assert_eq!(result.icons.background_icon, Some(server.url("/app/icon.png")));
    assert_eq!(result.links[0].url, server.url("/app/docs"));
    assert!(result.links[0].is_internal);
}

#[test]
fn test_import_chain_resolves_against_importing_sheet() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body(r#"<link rel="stylesheet" href="/css/main.css">"#);
    });
    server.mock(|when, then| {
        when.method(GET).path("/css/main.css");
        then.status(200).body(r#"@import url("theme/colors.css"); body { font-family: Inter, sans-serif; }"#);
    });
    server.mock(|when, then| {
        when.method(GET).path("/css/theme/colors.css");
        then.status(200)
            .body(r#"@import "../fonts/face.css"; :root { --primary-color: #112233; --secondary-color: #445566; }"#);
    });
    server.mock(|when, then| {
        when.method(GET).path("/css/fonts/face.css");
        then.status(200).body("@font-face { font-family: Inter; src: url(inter.woff2) format('woff2'); }");
    });

    let result = analyzer(false).analyze(&server.url("/")).unwrap();

    assert_eq!(result.colors.primary.as_deref(), Some("#112233"));
    assert_eq!(result.colors.secondary.as_deref(), Some("#445566"));
    assert_eq!(result.fonts.names, vec!["Inter"]);
    assert_eq!(result.fonts.urls["Inter"], Some(server.url("/css/fonts/inter.woff2")));
}

#[test]
fn test_import_cycle_fetches_each_sheet_once() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body(r#"<link rel="stylesheet" href="/a.css">"#);
    });
    let a = server.mock(|when, then| {
        when.method(GET).path("/a.css");
        then.status(200).body("@import 'b.css'; .primary { color: #aa0000; }");
    });
    let b = server.mock(|when, then| {
        when.method(GET).path("/b.css");
        then.status(200).body("@import 'a.css'; .secondary { color: #00bb00; }");
    });

    let result = analyzer(false).analyze(&server.url("/")).unwrap();

    a.assert_hits(1);
    b.assert_hits(1);
    assert_eq!(result.colors.primary.as_deref(), Some("#aa0000"));
    assert_eq!(result.colors.secondary.as_deref(), Some("#00bb00"));
}

#[test]
fn test_failed_stylesheet_is_skipped() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body(
            r#"<title>Partial</title>
               <link rel="stylesheet" href="/broken.css">
               <link rel="stylesheet" href="/ok.css">"#,
        );
    });
    server.mock(|when, then| {
        when.method(GET).path("/broken.css");
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(GET).path("/ok.css");
        then.status(200).body(".card { border-radius: 4px; }");
    });

    let result = analyzer(false).analyze(&server.url("/")).unwrap();

    assert_eq!(result.title, "Partial");
    assert_eq!(result.ui_specs.corner_radius.as_deref(), Some("4px"));
}

#[test]
fn test_favicon_probe_fills_both_icons() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body("<title>Bare</title>");
    });
    let probe = server.mock(|when, then| {
        when.method(HEAD).path("/favicon.ico");
        then.status(200);
    });

    let result = analyzer(true).analyze(&server.url("/")).unwrap();

    probe.assert();
    assert_eq!(result.icons.front_icon, Some(server.url("/favicon.ico")));
    assert_eq!(result.icons.front_icon, result.icons.background_icon);
}

#[test]
fn test_missing_favicon_leaves_icons_unset() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body("<title>Bare</title>");
    });
    server.mock(|when, then| {
        when.method(HEAD).path("/favicon.ico");
        then.status(404);
    });

    let result = analyzer(true).analyze(&server.url("/")).unwrap();

    assert_eq!(result.icons.front_icon, None);
    assert_eq!(result.icons.background_icon, None);
}

#[test]
fn test_page_status_is_fatal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone");
        then.status(404);
    });

    let err = analyzer(false).analyze(&server.url("/gone")).unwrap_err();

    match err {
        SitespecError::HttpStatus { url, status } => {
            assert_eq!(status, 404);
            assert_eq!(url, server.url("/gone"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_page_timeout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/slow");
        then.status(200).delay(Duration::from_secs(3)).body("<title>late</title>");
    });

    let config = AnalyzerConfig::builder().timeout(1).probe_favicon(false).build();
    let err = Analyzer::with_config(config).unwrap().analyze(&server.url("/slow")).unwrap_err();

    assert!(matches!(err, SitespecError::Timeout { timeout: 1, .. }));
}

#[test]
fn test_user_agent_is_sent() {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/").header("user-agent", "sitespec-test/1.0");
        then.status(200).body("<title>UA</title>");
    });

    let config = AnalyzerConfig::builder().user_agent("sitespec-test/1.0").probe_favicon(false).build();
    let result = Analyzer::with_config(config).unwrap().analyze(&server.url("/")).unwrap();

    page.assert();
    assert_eq!(result.title, "UA");
}

#[test]
fn test_fixture_page_offline() {
    let html = std::fs::read_to_string(get_fixture_path("landing.html")).unwrap();
    let result = analyzer(false).analyze_html(&html, "https://northwind.test/").unwrap();

    assert_eq!(result.title, "Northwind Coffee Roasters");
    assert_eq!(result.description, "Small-batch coffee, roasted every morning.");

    assert_eq!(
        result.icons.front_icon.as_deref(),
        Some("https://northwind.test/icons/apple-touch-icon.png")
    );
    assert_eq!(
        result.icons.background_icon.as_deref(),
        Some("https://northwind.test/icons/favicon-32.png")
    );
    assert_eq!(result.icons.background_color.as_deref(), Some("#3e2723"));
    assert_eq!(result.splash_screen.icon.as_deref(), Some("https://northwind.test/splash/large.png"));
    assert_eq!(result.splash_screen.color.as_deref(), Some("#3e2723"));

    assert_eq!(result.fonts.names[0], "Merriweather");
    assert!(result.fonts.names.contains(&"Playfair Display".to_string()));
    assert!(result.fonts.names.contains(&"Lato".to_string()));
    assert_eq!(
        result.fonts.urls["Merriweather"].as_deref(),
        Some("https://northwind.test/fonts/merriweather.woff2")
    );

    assert_eq!(result.colors.primary.as_deref(), Some("#6d4c41"));
    assert_eq!(result.colors.secondary.as_deref(), Some("#ffb300"));

    assert_eq!(result.ui_specs.shadow.opacity.as_deref(), Some("0.25"));
    assert_eq!(result.ui_specs.shadow.angle.as_deref(), Some("90.0°"));
    assert_eq!(result.ui_specs.border.thickness.as_deref(), Some("1px"));
    assert_eq!(result.ui_specs.border.color.as_deref(), Some("#d7ccc8"));
    assert_eq!(result.ui_specs.corner_radius.as_deref(), Some("12px"));
    assert_eq!(result.ui_specs.item_spacing.as_deref(), Some("1.5rem"));

    assert_eq!(result.internal_link_count(), 2);
    assert_eq!(result.external_link_count(), 2);
    assert!(result.links.iter().any(|l| l.text == "Find us"));
    assert!(result.links.iter().all(|l| !l.url.starts_with("javascript:")));
}

#[test]
fn test_output_formats() {
    let html = std::fs::read_to_string(get_fixture_path("landing.html")).unwrap();
    let result = analyzer(false).analyze_html(&html, "https://northwind.test/").unwrap();

    let json = result.to_format(OutputFormat::Json).unwrap();
    let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);

    let text = result.to_format(OutputFormat::Text).unwrap();
    assert!(text.starts_with("Northwind Coffee Roasters"));
    assert!(text.contains("Links (2 internal, 2 external)"));
}
