//! Collecting inline and linked stylesheets and inlining `@import` chains.

use std::collections::HashSet;

use url::Url;

use crate::css::patterns::{IMPORT_RULE, import_target};
use crate::css::{CssSource, StyleSheet};
use crate::fetch::Fetcher;
use crate::parse::{Document, Element, Matcher};

/// Builds the page's [`StyleSheet`].
///
/// Inline `<style>` blocks come first (resolved against the page URL), then
/// every `<link rel=stylesheet>` and `<link rel=preload as=style>` in
/// document order. Each linked URL is fetched at most once; fetch failures
/// contribute nothing.
pub fn aggregate_css(doc: &Document, fetcher: &dyn Fetcher, max_import_depth: usize) -> StyleSheet {
    let page_url = doc.base_url();
    let mut visited: HashSet<Url> = HashSet::new();
    let mut sources = Vec::new();

    for style in doc.find_all("style", &Matcher::Any) {
        let content = style.text();
        if content.trim().is_empty() {
            continue;
        }
        sources.extend(expand_imports(&content, page_url, 0, max_import_depth, &mut visited, fetcher));
    }

    for link in doc.find_all("link", &Matcher::HasAttr("href")) {
        if !is_stylesheet_link(&link) {
            continue;
        }
        let Some(href) = link.non_empty_attr("href") else {
            continue;
        };
        let Some(url) = doc.resolve(href) else {
            tracing::debug!(href, "unresolvable stylesheet href");
            continue;
        };
        if !visited.insert(url.clone()) {
            continue;
        }

        match fetcher.fetch_css(&url) {
            Some(content) => {
                sources.extend(expand_imports(&content, &url, 0, max_import_depth, &mut visited, fetcher));
            }
            None => tracing::debug!(url = %url, "skipping unavailable stylesheet"),
        }
    }

    StyleSheet::new(sources)
}

/// Replaces every `@import` in `content` with the fragments of its target.
///
/// Targets resolve against `base`. Imports found at `depth >= max_depth`,
/// targets already in `visited` and targets that cannot be fetched are
/// dropped, which bounds the recursion even for cyclic imports. The result
/// splits `content` around each import so every fragment keeps the base URL
/// of the sheet it came from.
pub fn expand_imports(
    content: &str, base: &Url, depth: usize, max_depth: usize, visited: &mut HashSet<Url>, fetcher: &dyn Fetcher,
) -> Vec<CssSource> {
    let mut fragments = Vec::new();
    let mut last = 0;

    for caps in IMPORT_RULE.captures_iter(content) {
        let Some(rule) = caps.get(0) else {
            continue;
        };
        push_fragment(&mut fragments, &content[last..rule.start()], base);
        last = rule.end();

        let Some(import) = import_target(&caps) else {
            continue;
        };
        if depth >= max_depth {
            tracing::debug!(import, depth, "import depth limit reached");
            continue;
        }
        let Ok(target) = base.join(import) else {
            tracing::debug!(import, "unresolvable import");
            continue;
        };
        if !visited.insert(target.clone()) {
            tracing::debug!(url = %target, "skipping repeated import");
            continue;
        }

        if let Some(imported) = fetcher.fetch_css(&target) {
            fragments.extend(expand_imports(&imported, &target, depth + 1, max_depth, visited, fetcher));
        }
    }

    push_fragment(&mut fragments, &content[last..], base);
    fragments
}

fn push_fragment(fragments: &mut Vec<CssSource>, content: &str, base: &Url) {
    if !content.trim().is_empty() {
        fragments.push(CssSource::new(content, base.clone()));
    }
}

fn is_stylesheet_link(link: &Element<'_>) -> bool {
    let tokens = link.rel_tokens();
    let has = |name: &str| tokens.iter().any(|t| t.eq_ignore_ascii_case(name));

    has("stylesheet") || (has("preload") && link.attr("as").is_some_and(|v| v.trim().eq_ignore_ascii_case("style")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticFetcher;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_inline_then_linked_in_order() {
        let html = r#"
            <html><head>
                <link rel="stylesheet" href="/a.css">
                <style>.inline { color: red }</style>
                <link rel="preload" as="style" href="b.css">
                <link rel="preload" as="font" href="font.woff2">
            </head></html>
        "#;
        let doc = Document::parse(html, url("https://site.test/blog/"));
        let fetcher = StaticFetcher::new()
            .css("https://site.test/a.css", ".a{}")
            .css("https://site.test/blog/b.css", ".b{}");

        let sheet = aggregate_css(&doc, &fetcher, 3);
        let contents: Vec<_> = sheet.sources().iter().map(|s| s.content.trim()).collect();

        assert_eq!(contents, vec![".inline { color: red }", ".a{}", ".b{}"]);
        assert_eq!(sheet.sources()[0].base_url.as_str(), "https://site.test/blog/");
        assert_eq!(sheet.sources()[2].base_url.as_str(), "https://site.test/blog/b.css");
        assert!(!fetcher.requests().iter().any(|r| r.ends_with("font.woff2")));
    }

    #[test]
    fn test_duplicate_links_fetched_once() {
        let html = r#"<link rel="stylesheet" href="/a.css"><link rel="stylesheet" href="https://site.test/a.css">"#;
        let doc = Document::parse(html, url("https://site.test/"));
        let fetcher = StaticFetcher::new().css("https://site.test/a.css", ".a{}");

        let sheet = aggregate_css(&doc, &fetcher, 3);

        assert_eq!(sheet.sources().len(), 1);
        assert_eq!(fetcher.requests(), vec!["https://site.test/a.css".to_string()]);
    }

    #[test]
    fn test_missing_stylesheet_is_skipped() {
        let doc = Document::parse(r#"<link rel="stylesheet" href="/gone.css">"#, url("https://site.test/"));
        let sheet = aggregate_css(&doc, &StaticFetcher::new(), 3);
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_import_resolves_against_importing_sheet() {
        let fetcher = StaticFetcher::new().css("https://cdn.test/css/theme/fonts.css", "@font-face{src:url(f.woff)}");
        let mut visited = HashSet::new();

        let fragments = expand_imports(
            "@import url('theme/fonts.css');\nbody{margin:0}",
            &url("https://cdn.test/css/main.css"),
            0,
            3,
            &mut visited,
            &fetcher,
        );

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].base_url.as_str(), "https://cdn.test/css/theme/fonts.css");
        assert_eq!(fragments[1].content.trim(), "body{margin:0}");
        assert_eq!(fragments[1].base_url.as_str(), "https://cdn.test/css/main.css");
    }

    #[test]
    fn test_import_url_with_semicolon_is_fetched_whole() {
        let font_css = "https://fonts.googleapis.com/css2?family=Roboto:wght@400;700&display=swap";
        let fetcher = StaticFetcher::new().css(font_css, "@font-face{font-family:'Roboto'}");
        let mut visited = HashSet::new();

        let fragments = expand_imports(
            &format!("@import url('{font_css}');\nbody{{margin:0}}"),
            &url("https://site.test/main.css"),
            0,
            3,
            &mut visited,
            &fetcher,
        );

        assert_eq!(fetcher.requests(), vec![font_css.to_string()]);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].content, "@font-face{font-family:'Roboto'}");
        assert!(fragments.iter().all(|f| !f.content.contains("700&display")));
        assert_eq!(fragments[1].content.trim(), "body{margin:0}");
    }

    #[test]
    fn test_self_import_terminates() {
        let doc = Document::parse(r#"<link rel="stylesheet" href="/loop.css">"#, url("https://site.test/"));
        let fetcher = StaticFetcher::new().css("https://site.test/loop.css", "@import 'loop.css'; .x{color:red}");

        let sheet = aggregate_css(&doc, &fetcher, 3);

        assert_eq!(sheet.text().trim(), ".x{color:red}");
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[test]
    fn test_mutual_import_cycle_terminates() {
        let fetcher = StaticFetcher::new()
            .css("https://site.test/a.css", "@import 'b.css'; .a{}")
            .css("https://site.test/b.css", "@import 'a.css'; .b{}");
        let doc = Document::parse(r#"<link rel="stylesheet" href="/a.css">"#, url("https://site.test/"));

        let sheet = aggregate_css(&doc, &fetcher, 3);
        let contents: Vec<_> = sheet.sources().iter().map(|s| s.content.trim()).collect();

        assert_eq!(contents, vec![".b{}", ".a{}"]);
    }

    #[test]
    fn test_import_depth_is_capped() {
        let mut fetcher = StaticFetcher::new();
        for i in 1..=5 {
            let body = if i < 5 { format!("@import 'l{}.css'; .l{}{{}}", i + 1, i) } else { ".l5{}".to_string() };
            fetcher = fetcher.css(&format!("https://site.test/l{}.css", i), &body);
        }
        let doc = Document::parse(r#"<link rel="stylesheet" href="/l1.css">"#, url("https://site.test/"));

        let sheet = aggregate_css(&doc, &fetcher, 3);
        let text = sheet.text();

        for kept in [".l1", ".l2", ".l3", ".l4"] {
            assert!(text.contains(kept), "{kept} should be inlined");
        }
        assert!(!text.contains(".l5"));
        assert!(!fetcher.requests().iter().any(|r| r.ends_with("l5.css")));
    }

    #[test]
    fn test_repeated_import_across_sheets_is_inlined_once() {
        let fetcher = StaticFetcher::new()
            .css("https://site.test/a.css", "@import 'shared.css';")
            .css("https://site.test/b.css", "@import 'shared.css';")
            .css("https://site.test/shared.css", ".shared{}");
        let doc = Document::parse(
            r#"<link rel="stylesheet" href="/a.css"><link rel="stylesheet" href="/b.css">"#,
            url("https://site.test/"),
        );

        let sheet = aggregate_css(&doc, &fetcher, 3);

        assert_eq!(sheet.text().matches(".shared").count(), 1);
    }
}
