use crate::fallback::Fallback;
use crate::parse::{Document, Matcher};

/// Title used when the page offers none.
pub const UNKNOWN_TITLE: &str = "Unknown name";

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Document {
    /// Extract title with priority fallback:
    /// 1. Open Graph `og:title`
    /// 2. `<title>` element
    /// 3. First `<h1>` element
    /// 4. [`UNKNOWN_TITLE`]
    pub fn extract_title(&self) -> String {
        Fallback::new()
            .or_try(|| non_blank(self.meta_content("property", "og:title")))
            .or_try(|| non_blank(self.title()))
            .or_try(|| non_blank(self.find_first("h1", &Matcher::Any).map(|h1| h1.trimmed_text())))
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }

    /// Extract description with priority fallback:
    /// 1. Meta `description`
    /// 2. Open Graph `og:description`
    ///
    /// Empty when neither is present.
    pub fn extract_description(&self) -> String {
        Fallback::new()
            .or_try(|| non_blank(self.meta_content("name", "description")))
            .or_try(|| non_blank(self.meta_content("property", "og:description")))
            .unwrap_or_else(String::new)
    }
}
