use crate::rules::{number, Issue, LintRule};
use serde_json::Value;
use tokenweave_tokens::{font_weight_keyword, TokenType};

pub struct FontWeightRule;

impl LintRule for FontWeightRule {
    fn name(&self) -> &'static str {
        "valid-font-weight"
    }

    fn description(&self) -> &'static str {
        "Font weights must be 1-1000 or a known weight keyword"
    }

    fn applies_to(&self, token_type: &TokenType) -> bool {
        *token_type == TokenType::FontWeight
    }

    fn check_value(&self, _token_type: &TokenType, value: &Value) -> Vec<Issue> {
        check_font_weight(value)
    }
}

pub(crate) fn check_font_weight(value: &Value) -> Vec<Issue> {
    if let Some(keyword) = value.as_str() {
        return match font_weight_keyword(keyword) {
            Some(_) => Vec::new(),
            None => vec![Issue::warning(format!(
                "Unknown font weight keyword '{}' is passed through as-is",
                keyword
            ))
            .with_suggestion("Use a numeric weight or a keyword such as 'bold'")],
        };
    }

    match number(value) {
        Some(weight) if (1.0..=1000.0).contains(&weight) => Vec::new(),
        Some(_) => vec![Issue::error("Font weight must be between 1 and 1000")],
        None => vec![Issue::error("Font weight must be a number or a keyword")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticLevel;
    use serde_json::json;

    #[test]
    fn test_font_weights() {
        assert!(check_font_weight(&json!(700)).is_empty());
        assert!(check_font_weight(&json!("Semi-Bold")).is_empty());
        assert_eq!(check_font_weight(&json!(0))[0].level, DiagnosticLevel::Error);
        assert_eq!(check_font_weight(&json!("chunky"))[0].level, DiagnosticLevel::Warning);
    }
}
