use crate::Result;
use crate::analysis::AnalysisResult;

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Convert an analysis result to JSON
pub fn convert_to_json(result: &AnalysisResult, config: &JsonConfig) -> Result<String> {
    let json = if config.pretty { serde_json::to_string_pretty(result)? } else { serde_json::to_string(result)? };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::sample_result;

    #[test]
    fn test_convert_to_json_compact() {
        let json = convert_to_json(&sample_result(), &JsonConfig::default()).unwrap();
        assert!(json.starts_with("{\"url\":\"https://acme.test\""));
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_convert_to_json_pretty() {
        let json = convert_to_json(&sample_result(), &JsonConfig { pretty: true }).unwrap();
        assert!(json.contains("\n  \"title\": \"Acme Rockets\""));
    }

    #[test]
    fn test_field_names_and_nulls() {
        let json = convert_to_json(&sample_result(), &JsonConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        for key in ["url", "title", "description", "icons", "splash_screen", "fonts", "colors", "ui_specs", "links"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["icons"]["front_icon"], "https://acme.test/apple-touch-icon.png");
        assert_eq!(value["fonts"]["styles"][0]["name"], "Inter");
        assert!(value["colors"]["tertiary"].is_null());
        assert_eq!(value["links"][1]["is_internal"], false);
    }
}
